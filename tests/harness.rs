use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use minex_validation::template::{declared_length, FingerMinutiaeRecord};
use minex_validation::{
    Harness, HarnessConfig, ImageData, LibraryIds, MinexError, PairTable, ProductId, ReturnCode,
    SampleMetadata, SamplePair, SampleTable, TemplateEngine,
};

const SAMPLES: &str = "# filename\twidth\theight\tquality\tposition\timpression\n\
                       A.gray\t150\t166\t60\t2\t0\n\
                       B.gray\t812\t1000\t80\t7\t2\n\
                       C.gray\t500\t500\t20\t2\t0\n";

/// Stands in for a participant library: templates carry a minutiae count
/// derived from the first pixel, and are followed by padding in the buffer.
#[derive(Default)]
struct ScriptedEngine {
    return_codes: HashMap<String, ReturnCode>,
    created: HashMap<String, Vec<u8>>,
    matched: Vec<(Vec<u8>, Vec<u8>)>,
    declared_length: Option<u16>,
    corrupt: bool,
    calls: Vec<String>,
}

fn build_template(metadata: &SampleMetadata, num_minutiae: u8) -> Vec<u8> {
    let length = 26 + 4 + 6 * num_minutiae as usize + 2;
    let mut buf = Vec::with_capacity(length);
    buf.extend_from_slice(b"FMR\0 20\0");
    buf.extend_from_slice(&(length as u16).to_be_bytes());
    buf.extend_from_slice(&0x1234_0005u32.to_be_bytes());
    buf.extend_from_slice(&0u16.to_be_bytes());
    buf.extend_from_slice(&metadata.width.to_be_bytes());
    buf.extend_from_slice(&metadata.height.to_be_bytes());
    buf.extend_from_slice(&197u16.to_be_bytes());
    buf.extend_from_slice(&197u16.to_be_bytes());
    buf.extend_from_slice(&[1, 0]);
    buf.extend_from_slice(&[
        metadata.position,
        metadata.impression,
        metadata.quality,
        num_minutiae,
    ]);
    for i in 0..num_minutiae as u16 {
        buf.extend_from_slice(&(10 + i).to_be_bytes());
        buf.extend_from_slice(&(20 + i).to_be_bytes());
        buf.extend_from_slice(&[i as u8, 40]);
    }
    buf.extend_from_slice(&0u16.to_be_bytes());
    buf
}

impl TemplateEngine for ScriptedEngine {
    fn create_template(
        &mut self,
        image: &ImageData,
        metadata: &SampleMetadata,
        output: &mut [u8],
    ) -> ReturnCode {
        self.calls.push(metadata.filename.clone());

        let template = build_template(metadata, image.data()[0] % 20);
        output[..template.len()].copy_from_slice(&template);
        for byte in &mut output[template.len()..template.len() + 16] {
            *byte = 0xAA;
        }
        if self.corrupt {
            output[0] = b'X';
        }
        if let Some(length) = self.declared_length {
            output[8..10].copy_from_slice(&length.to_be_bytes());
        }

        self.created.insert(metadata.filename.clone(), template);
        self.return_codes
            .get(&metadata.filename)
            .copied()
            .unwrap_or(ReturnCode::Success)
    }

    fn match_templates(&mut self, verification: &[u8], enrollment: &[u8]) -> (ReturnCode, f32) {
        self.matched.push((verification.to_vec(), enrollment.to_vec()));
        let similarity = if verification == enrollment {
            1.0
        } else {
            (verification.len() + enrollment.len()) as f32 / 1000.0
        };
        (ReturnCode::Success, similarity)
    }

    fn pids(&mut self) -> LibraryIds {
        LibraryIds {
            generator: ProductId(0x1234_0005),
            matcher: ProductId(0xabcd_0102),
        }
    }
}

fn scratch(name: &str) -> PathBuf {
    let base = std::env::temp_dir().join(format!(
        "minex-validation-{}-{}-{}",
        name,
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or_default()
    ));
    fs::create_dir_all(base.join("images")).unwrap();
    base
}

fn write_images(base: &Path, samples: &SampleTable) {
    for (i, sample) in samples.iter().enumerate() {
        let pixels = vec![(i * 7 + 3) as u8; sample.width as usize * sample.height as usize];
        fs::write(base.join("images").join(&sample.filename), pixels).unwrap();
    }
}

fn harness(base: &Path, engine: ScriptedEngine, pairs: PairTable) -> Harness<ScriptedEngine> {
    let samples = SampleTable::parse("samples", SAMPLES).unwrap();
    write_images(base, &samples);

    let mut config = HarnessConfig::new();
    config.set_images_dir(base.join("images"));
    config.set_output_dir(base.join("output"));
    Harness::new(engine, config, samples, pairs)
}

fn lines(out: &[u8]) -> Vec<String> {
    String::from_utf8(out.to_vec())
        .unwrap()
        .lines()
        .map(String::from)
        .collect()
}

fn all_pairs() -> PairTable {
    PairTable::new(vec![
        SamplePair::new("A.gray.tmpl", "B.gray.tmpl"),
        SamplePair::new("B.gray.tmpl", "C.gray.tmpl"),
        SamplePair::new("C.gray.tmpl", "C.gray.tmpl"),
        SamplePair::new("A.gray.tmpl", "C.gray.tmpl"),
    ])
}

#[test]
fn test_creation_persists_declared_length() {
    let base = scratch("create");
    let mut harness = harness(&base, ScriptedEngine::default(), PairTable::default());

    let mut out = vec![];
    let summary = harness.test_creation(&mut out, 42).unwrap();
    assert_eq!(3, summary.items);
    assert_eq!(0, summary.failures);

    let lines = lines(&out);
    assert_eq!("Input\tRV\tTemplateSize", lines[0]);
    assert_eq!(4, lines.len());

    for line in &lines[1..] {
        let fields: Vec<&str> = line.split('\t').collect();
        assert_eq!(3, fields.len());
        assert_eq!("0", fields[1]);

        let expected = &harness.engine().created[fields[0]];
        let persisted = fs::read(base.join("output").join(format!("{}.tmpl", fields[0]))).unwrap();
        assert_eq!(expected, &persisted);
        assert_eq!(fields[2], persisted.len().to_string());

        let length = declared_length(&persisted).unwrap();
        assert!((32..=800).contains(&length));
        assert_eq!(length as usize, persisted.len());
        FingerMinutiaeRecord::parse(&persisted).unwrap();
    }

    fs::remove_dir_all(&base).unwrap();
}

#[test]
fn test_creation_order_is_deterministic() {
    let first = scratch("order-a");
    let second = scratch("order-b");

    let mut out_a = vec![];
    let mut a = harness(&first, ScriptedEngine::default(), PairTable::default());
    a.test_creation(&mut out_a, 7).unwrap();

    let mut out_b = vec![];
    let mut b = harness(&second, ScriptedEngine::default(), PairTable::default());
    b.test_creation(&mut out_b, 7).unwrap();

    assert_eq!(out_a, out_b);
    assert_eq!(a.engine().calls, b.engine().calls);

    let mut names = a.engine().calls.clone();
    names.sort();
    assert_eq!(vec!["A.gray", "B.gray", "C.gray"], names);

    fs::remove_dir_all(&first).unwrap();
    fs::remove_dir_all(&second).unwrap();
}

// Orders g++/libstdc++ std::shuffle gives with std::mt19937_64(seed) for the
// same sorted image list and pair table.
#[test]
fn test_creation_order_matches_std_shuffle() {
    let cases: [(i64, [&str; 3]); 4] = [
        (7, ["A.gray", "C.gray", "B.gray"]),
        (42, ["A.gray", "C.gray", "B.gray"]),
        (123_456_789, ["B.gray", "A.gray", "C.gray"]),
        (-1, ["C.gray", "A.gray", "B.gray"]),
    ];

    for (seed, expected) in cases.iter() {
        let base = scratch("std-shuffle-order");
        let mut harness = harness(&base, ScriptedEngine::default(), PairTable::default());

        let mut out = vec![];
        harness.test_creation(&mut out, *seed as u64).unwrap();
        assert_eq!(expected.to_vec(), harness.engine().calls, "seed {}", seed);

        let logged: Vec<String> = lines(&out)[1..]
            .iter()
            .map(|line| line.split('\t').next().unwrap_or_default().to_string())
            .collect();
        assert_eq!(expected.to_vec(), logged, "seed {}", seed);

        fs::remove_dir_all(&base).unwrap();
    }
}

#[test]
fn test_matching_order_matches_std_shuffle() {
    let base = scratch("std-shuffle-match-order");
    let mut harness = harness(&base, ScriptedEngine::default(), all_pairs());
    harness.test_creation(&mut vec![], 0).unwrap();

    let pairs = all_pairs();
    for (seed, expected) in [(42i64, [0, 2, 1, 3]), (-1, [3, 0, 2, 1]), (5489, [2, 1, 0, 3])].iter() {
        let mut out = vec![];
        harness.test_matching(&mut out, *seed as u64).unwrap();

        let logged: Vec<String> = lines(&out)[1..]
            .iter()
            .map(|line| line.splitn(3, '\t').take(2).collect::<Vec<&str>>().join("\t"))
            .collect();
        let wanted: Vec<String> = expected
            .iter()
            .map(|&i| pairs.pairs()[i].to_string())
            .collect();
        assert_eq!(wanted, logged, "seed {}", seed);
    }

    fs::remove_dir_all(&base).unwrap();
}

#[test]
fn test_creation_reuses_existing_output_dir() {
    let base = scratch("reuse");
    let mut harness = harness(&base, ScriptedEngine::default(), PairTable::default());

    let mut first = vec![];
    harness.test_creation(&mut first, 1).unwrap();
    let mut second = vec![];
    harness.test_creation(&mut second, 1).unwrap();
    assert_eq!(first, second);

    fs::remove_dir_all(&base).unwrap();
}

#[test]
fn test_creation_records_library_failures() {
    let base = scratch("failures");
    let mut engine = ScriptedEngine::default();
    engine
        .return_codes
        .insert("B.gray".to_string(), ReturnCode::BadImageSize);
    engine
        .return_codes
        .insert("C.gray".to_string(), ReturnCode::Other(-9));
    let mut harness = harness(&base, engine, PairTable::default());

    let mut out = vec![];
    let summary = harness.test_creation(&mut out, 3).unwrap();
    assert_eq!(3, summary.items);
    assert_eq!(2, summary.failures);

    let lines = lines(&out);
    assert!(lines.iter().any(|l| l.starts_with("A.gray\t0\t")));
    assert!(lines.iter().any(|l| l.starts_with("B.gray\t1\t")));
    assert!(lines.iter().any(|l| l.starts_with("C.gray\t-9\t")));
    assert!(base.join("output").join("B.gray.tmpl").is_file());

    fs::remove_dir_all(&base).unwrap();
}

#[test]
fn test_creation_missing_metadata() {
    let base = scratch("metadata");
    let mut harness = harness(&base, ScriptedEngine::default(), PairTable::default());

    match harness.create_template("Z.gray") {
        Err(MinexError::MissingMetadata(name)) => assert_eq!("Z.gray", name),
        other => panic!("unexpected result: {:?}", other),
    }

    fs::remove_dir_all(&base).unwrap();
}

#[test]
fn test_creation_missing_image_aborts() {
    let base = scratch("missing-image");
    let mut harness = harness(&base, ScriptedEngine::default(), PairTable::default());
    fs::remove_file(base.join("images").join("B.gray")).unwrap();

    let mut out = vec![];
    match harness.test_creation(&mut out, 5) {
        Err(MinexError::Open { path, .. }) => assert!(path.ends_with("B.gray")),
        other => panic!("unexpected result: {:?}", other),
    }

    fs::remove_dir_all(&base).unwrap();
}

#[test]
fn test_creation_invalid_template_strict_and_lenient() {
    let base = scratch("strict");
    let engine = ScriptedEngine {
        corrupt: true,
        ..ScriptedEngine::default()
    };
    let mut harness = harness(&base, engine, PairTable::default());

    let mut out = vec![];
    let summary = harness.test_creation(&mut out, 11).unwrap();
    assert_eq!(3, summary.items);

    let samples = SampleTable::parse("samples", SAMPLES).unwrap();
    let pairs = PairTable::default();
    let mut config = harness.config().clone();
    config.set_strict(true);
    let engine = ScriptedEngine {
        corrupt: true,
        ..ScriptedEngine::default()
    };
    let mut strict = Harness::new(engine, config, samples, pairs);
    match strict.create_template("A.gray") {
        Err(MinexError::InvalidTemplate { name, .. }) => assert_eq!("A.gray", name),
        other => panic!("unexpected result: {:?}", other),
    }

    fs::remove_dir_all(&base).unwrap();
}

#[test]
fn test_creation_length_beyond_buffer() {
    let base = scratch("oversized");
    let engine = ScriptedEngine {
        declared_length: Some(u16::MAX),
        ..ScriptedEngine::default()
    };
    let mut harness = harness(&base, engine, PairTable::default());
    fs::create_dir_all(base.join("output")).unwrap();

    match harness.create_template("A.gray") {
        Err(MinexError::InvalidTemplate { .. }) => {}
        other => panic!("unexpected result: {:?}", other),
    }

    fs::remove_dir_all(&base).unwrap();
}

#[test]
fn test_matching_reads_created_templates() {
    let base = scratch("match");
    let mut harness = harness(&base, ScriptedEngine::default(), all_pairs());

    let mut created = vec![];
    harness.test_creation(&mut created, 42).unwrap();

    let mut out = vec![];
    let summary = harness.test_matching(&mut out, 42).unwrap();
    assert_eq!(4, summary.items);

    let lines = lines(&out);
    assert_eq!("VerificationName\tEnrollmentName\tRV\tSimilarity", lines[0]);
    assert_eq!(5, lines.len());
    assert!(lines.contains(&"C.gray.tmpl\tC.gray.tmpl\t0\t1.000000".to_string()));

    let engine = harness.engine();
    for (verification, enrollment) in &engine.matched {
        assert!(engine.created.values().any(|t| t == verification));
        assert!(engine.created.values().any(|t| t == enrollment));
    }

    fs::remove_dir_all(&base).unwrap();
}

#[test]
fn test_matching_order_is_deterministic() {
    let base = scratch("match-order");
    let mut harness = harness(&base, ScriptedEngine::default(), all_pairs());
    harness.test_creation(&mut vec![], 0).unwrap();

    let mut first = vec![];
    harness.test_matching(&mut first, 99).unwrap();
    let mut second = vec![];
    harness.test_matching(&mut second, 99).unwrap();
    assert_eq!(first, second);

    fs::remove_dir_all(&base).unwrap();
}

#[test]
fn test_matching_missing_template_aborts() {
    let base = scratch("match-missing");
    let pairs = PairTable::new(vec![SamplePair::new("A.gray.tmpl", "Q.gray.tmpl")]);
    let mut harness = harness(&base, ScriptedEngine::default(), pairs);
    harness.test_creation(&mut vec![], 0).unwrap();

    let mut out = vec![];
    match harness.test_matching(&mut out, 1) {
        Err(MinexError::Open { path, .. }) => assert!(path.ends_with("Q.gray.tmpl")),
        other => panic!("unexpected result: {:?}", other),
    }

    fs::remove_dir_all(&base).unwrap();
}

#[test]
fn test_library_id_output() {
    let base = scratch("pid");
    let mut harness = harness(&base, ScriptedEngine::default(), PairTable::default());

    let mut out = vec![];
    harness.test_library_id(&mut out).unwrap();
    assert_eq!(
        "GProduct\tGVersion\tMProduct\tMVersion\n1234\t0005\tabcd\t0102\n",
        String::from_utf8(out).unwrap()
    );

    fs::remove_dir_all(&base).unwrap();
}

#[test]
fn test_generated_pairs_round_trip_through_table() {
    let base = scratch("pairs");
    let samples = SampleTable::builtin().unwrap().clone();
    let mut config = HarnessConfig::new();
    config.set_max_impostor(100);
    let harness = Harness::new(ScriptedEngine::default(), config, samples, PairTable::default());

    let mut out = vec![];
    let table = harness.generate_pairs(&mut out, 42).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.starts_with("# verification\tenrollment\n"));
    assert_eq!(table, PairTable::parse("generated", &text).unwrap());

    let mut again = vec![];
    harness.generate_pairs(&mut again, 42).unwrap();
    assert_eq!(text, String::from_utf8(again).unwrap());

    fs::remove_dir_all(&base).unwrap();
}
