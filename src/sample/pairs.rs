// This file is part of minex-validation, a validation driver for MINEX III
// fingerprint template generators and matchers.
//
// You can redistribute minex-validation source codes and/or modify it under the
// terms of the BSD 2-Clause License.
//
// You should have received a copy of the BSD 2-Clause License along with the software.
// If not, see < https://opensource.org/licenses/BSD-2-Clause>.

use std::collections::BTreeMap;

use tracing::debug;

use crate::random::Mt64;
use crate::sample::{PairTable, SamplePair, SampleTable};

/// Encounter that serves as the enrollment sample for a subject's finger.
const ENROLLMENT_ENCOUNTER: char = 'b';
/// Encounter paired against enrollment as the genuine probe.
const PROBE_ENCOUNTER: char = 'a';

/// Components of a sample named `<encounter><subject>_<finger>.<ext>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateName<'a> {
    pub encounter: char,
    pub subject: &'a str,
    pub finger: &'a str,
}

impl<'a> TemplateName<'a> {
    pub fn parse(filename: &'a str) -> Option<Self> {
        let stem = match filename.find('.') {
            Some(dot) => &filename[..dot],
            None => filename,
        };
        let (encounter_subject, finger) = stem.split_once('_')?;
        if finger.is_empty() || finger.contains('_') {
            return None;
        }

        let mut chars = encounter_subject.chars();
        let encounter = chars.next()?;
        if !encounter.is_ascii_alphabetic() {
            return None;
        }
        let subject = chars.as_str();
        if subject.is_empty() {
            return None;
        }

        Some(TemplateName {
            encounter,
            subject,
            finger,
        })
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PairOptions {
    /// Number of impostor draws; draws that hit the same subject or a finger
    /// the second subject lacks produce no pair.
    pub max_impostor: usize,
}

impl Default for PairOptions {
    fn default() -> Self {
        PairOptions { max_impostor: 1000 }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedPairs {
    pub table: PairTable,
    pub genuine: usize,
    pub impostors: usize,
}

fn template_name(filename: &str) -> String {
    format!("{}.tmpl", filename)
}

/// Derive genuine and impostor comparisons from the sample names in `samples`.
pub fn make_pairs(samples: &SampleTable, options: &PairOptions, rng: &mut Mt64) -> GeneratedPairs {
    // subject -> finger -> probe file names, in encounter order
    let mut probes: BTreeMap<&str, BTreeMap<&str, Vec<&str>>> = BTreeMap::new();
    let mut enrollments: BTreeMap<(&str, &str), &str> = BTreeMap::new();

    let mut named: Vec<(TemplateName, &str)> = samples
        .names()
        .filter_map(|filename| TemplateName::parse(filename).map(|name| (name, filename)))
        .collect();
    named.sort_by(|(a, _), (b, _)| {
        (a.subject, a.finger, a.encounter).cmp(&(b.subject, b.finger, b.encounter))
    });

    for (name, filename) in named {
        if name.encounter == ENROLLMENT_ENCOUNTER {
            enrollments.insert((name.subject, name.finger), filename);
        } else {
            probes
                .entry(name.subject)
                .or_default()
                .entry(name.finger)
                .or_default()
                .push(filename);
        }
    }

    let mut pairs = vec![];

    for (subject, fingers) in &probes {
        for (finger, files) in fingers {
            let enrollment = match enrollments.get(&(*subject, *finger)) {
                Some(enrollment) => enrollment,
                None => continue,
            };
            for file in files {
                if file.starts_with(PROBE_ENCOUNTER) {
                    pairs.push(SamplePair::new(template_name(file), template_name(enrollment)));
                }
            }
        }
    }

    for fingers in probes.values() {
        for files in fingers.values() {
            if let (Some(first), Some(second)) = (rng.choose(files), rng.choose(files)) {
                pairs.push(SamplePair::new(template_name(first), template_name(second)));
            }
        }
    }
    let genuine = pairs.len();

    let subjects: Vec<&str> = probes.keys().copied().collect();
    let mut impostors = 0;
    for _ in 0..options.max_impostor {
        let (subject1, subject2) = match (rng.choose(&subjects), rng.choose(&subjects)) {
            (Some(s1), Some(s2)) => (s1, s2),
            _ => break,
        };
        if subject1 == subject2 {
            continue;
        }

        let fingers1: Vec<&str> = probes[subject1].keys().copied().collect();
        let finger = match rng.choose(&fingers1) {
            Some(finger) => finger,
            None => continue,
        };
        let files2 = match probes[subject2].get(finger) {
            Some(files) => files,
            None => continue,
        };

        let files1 = &probes[subject1][finger];
        if let (Some(file1), Some(file2)) = (rng.choose(files1), rng.choose(files2)) {
            pairs.push(SamplePair::new(template_name(file1), template_name(file2)));
            impostors += 1;
        }
    }

    debug!("generated {} genuine and {} impostor pairs", genuine, impostors);

    GeneratedPairs {
        table: PairTable::new(pairs),
        genuine,
        impostors,
    }
}
