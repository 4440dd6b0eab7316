#![expect(
    clippy::unwrap_used,
    clippy::panic,
    reason = "test code uses unwrap/panic for concise assertions"
)]

use sbgn_convert::{
    adapter_for, ConvertEngine, ConvertOptions, EntityClass, Error, Format, Network, RawDocument,
    WriteOptions,
};

fn load_fixture(filename: &str) -> String {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    let path = format!("{manifest_dir}/tests/fixtures/{filename}");
    std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("failed to read {path}: {e}"))
}

fn load_document(filename: &str, format: Format) -> RawDocument {
    RawDocument {
        name: filename.to_string(),
        format,
        contents: load_fixture(filename),
    }
}

fn read_fixture_network(filename: &str, format: Format) -> Network {
    let document = load_document(filename, format);
    adapter_for(format)
        .read_model(&document.contents)
        .unwrap_or_else(|e| panic!("failed to parse {filename}: {e}"))
}

// ──────────────────── reading ────────────────────

#[test]
fn mapk_fixture_parses_with_expected_shape() {
    let net = read_fixture_network("mapk.sbgntxt", Format::Sbgntxt);
    assert_eq!(net.compartments.len(), 1);
    assert_eq!(net.entities.len(), 5);
    assert_eq!(net.processes.len(), 1);
    assert_eq!(net.modulations.len(), 1);
    assert!(net.validate().is_empty());

    // the two ERK pools differ only in their phosphorylation state
    let pools: Vec<_> = net
        .entities
        .iter()
        .filter(|e| e.label.as_deref() == Some("ERK"))
        .collect();
    assert_eq!(pools.len(), 2);
}

#[test]
fn dephosphorylation_fixture_parses_from_json() {
    let net = read_fixture_network("dephosphorylation.json", Format::Json);
    assert_eq!(net.entities.len(), 3);
    assert_eq!(net.processes.len(), 1);
    assert!(net.validate().is_empty());
}

// ──────────────────── conversion ────────────────────

#[test]
fn sbgntxt_survives_a_json_round_trip() {
    let original = read_fixture_network("mapk.sbgntxt", Format::Sbgntxt);

    let inputs = [load_document("mapk.sbgntxt", Format::Sbgntxt)];
    let json = ConvertEngine::convert(&inputs, Format::Json, &ConvertOptions::default()).unwrap();
    let back = ConvertEngine::convert(
        &[RawDocument {
            name: "roundtrip.json".to_string(),
            format: Format::Json,
            contents: json,
        }],
        Format::Sbgntxt,
        &ConvertOptions::default(),
    )
    .unwrap();

    let reparsed = adapter_for(Format::Sbgntxt).read_model(&back).unwrap();
    assert!(reparsed.equivalent(&original));
}

#[test]
fn merging_sbgntxt_and_json_inputs_shares_entities() {
    let inputs = [
        load_document("mapk.sbgntxt", Format::Sbgntxt),
        load_document("dephosphorylation.json", Format::Json),
    ];
    let json = ConvertEngine::convert(&inputs, Format::Json, &ConvertOptions::default()).unwrap();
    let merged = adapter_for(Format::Json).read_model(&json).unwrap();

    // both ERK pools and the cytosol are shared; PP2A and its process are new
    assert_eq!(merged.compartments.len(), 1);
    assert_eq!(merged.entities.len(), 6);
    assert_eq!(merged.processes.len(), 2);
    assert_eq!(merged.modulations.len(), 2);
    assert!(merged.validate().is_empty());
}

#[test]
fn renewed_ids_are_canonical_in_the_output() {
    let inputs = [load_document("mapk.sbgntxt", Format::Sbgntxt)];
    let rendered =
        ConvertEngine::convert(&inputs, Format::Sbgntxt, &ConvertOptions::default()).unwrap();
    assert!(rendered.contains("compartment c1"));
    assert!(rendered.lines().any(|l| l.starts_with("entity e1 ")));
    assert!(rendered.lines().any(|l| l.starts_with("process p1 ")));
}

// ──────────────────── exports ────────────────────

#[test]
fn sif_export_renders_interaction_rows() {
    let inputs = [load_document("mapk.sbgntxt", Format::Sbgntxt)];
    let sif = ConvertEngine::convert(&inputs, Format::Sif, &ConvertOptions::default()).unwrap();
    assert!(sif.lines().any(|l| l == "MEK\tcatalysis\tERK"));
    assert!(sif.lines().any(|l| l == "ATP\tprocess\tADP"));
}

#[test]
fn dot_export_renders_a_digraph() {
    let inputs = [load_document("mapk.sbgntxt", Format::Sbgntxt)];
    let dot = ConvertEngine::convert(&inputs, Format::Dot, &ConvertOptions::default()).unwrap();
    assert!(dot.starts_with("digraph network {"));
    assert!(dot.contains("label=\"cytosol\""));
    assert!(dot.contains("arrowhead=odot"));
}

#[test]
fn sif_export_of_gene_expression_fails_on_the_empty_set() {
    let inputs = [load_document("gene_expression.sbgntxt", Format::Sbgntxt)];
    let err =
        ConvertEngine::convert(&inputs, Format::Sif, &ConvertOptions::default()).unwrap_err();
    let Error::Write(write) = err else {
        panic!("expected a write error");
    };
    assert!(write.message().unwrap().contains("empty set"));
}

// ──────────────────── model operations end to end ────────────────────

#[test]
fn gene_expression_fixture_simplifies() {
    let mut net = read_fixture_network("gene_expression.sbgntxt", Format::Sbgntxt);
    assert_eq!(net.transcriptions().len(), 1);
    assert_eq!(net.translations().len(), 1);

    net.simplify_gene_expressions();

    assert!(net.validate().is_empty());
    assert!(net
        .entities
        .iter()
        .all(|e| e.class != EntityClass::NucleicAcidFeature));
    assert_eq!(net.processes.len(), 1);
    // SP1's catalysis of transcription now drives the translation directly
    let tln = net.get_process("tln").unwrap();
    let driven = net
        .modulations
        .iter()
        .filter(|m| m.target == tln.id)
        .count();
    assert_eq!(driven, 1);

    // the simplified network still writes cleanly
    let rendered = adapter_for(Format::Sbgntxt)
        .write_model(&net, &WriteOptions::default())
        .unwrap();
    assert!(rendered.contains("\"SP1\""));
}
