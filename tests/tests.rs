mod common;

use approx::assert_relative_eq;
use common::{clinic, fixture, graph, node, reference, write_export};
use er_grader::{
    build_graph, load_reference, score, BuildStats, CanonicalGraph, DetailKind, Details, Grader,
    GradingConfig, GradingError, NameCase, OutcomeStatus, ReferenceGraph, ScoreNorm,
};
use serde_json::json;
use std::fs;

#[test]
fn test_decode_attribute_edge() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_export(dir.path(), "doctor.json", &["entity-attr Doctor->Name"]);

    let expected = graph(vec![
        ("Doctor", node(&[], &["Name"])),
        ("Name", node(&[], &[])),
    ]);
    assert_eq!(expected, build_graph(&path).unwrap());
}

#[test]
fn test_decode_composite_edge() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_export(
        dir.path(),
        "composite.json",
        &["entity-attr-composite Patient->Address->Street"],
    );

    let expected = graph(vec![
        ("Patient", node(&[], &["Address"])),
        ("Address", node(&["Patient"], &["Street"])),
        ("Street", node(&[], &[])),
    ]);
    assert_eq!(expected, build_graph(&path).unwrap());
}

#[test]
fn test_decode_generalization_and_relationship() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_export(
        dir.path(),
        "isa.json",
        &[
            "e1 isA: entity: Surgeon|specialty Doctor",
            "e2 relationship-part: treats$Doctor->Patient",
        ],
    );

    let expected = graph(vec![
        ("Surgeon", node(&["Doctor"], &[])),
        ("Doctor", node(&[], &[])),
        ("treats", node(&["Doctor", "Patient"], &[])),
        ("Patient", node(&[], &[])),
    ]);
    assert_eq!(expected, build_graph(&path).unwrap());
}

#[test]
fn test_skipped_edges_do_not_touch_graph() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_export(
        dir.path(),
        "skipped.json",
        &[
            "entity-attr Doctor->Name",
            "e2 unknown-marker Doctor->Patient",
            "relationship-part: treats Doctor->Patient",
            "entity-attr-composite Patient->->Street",
        ],
    );

    let (graph, stats) = Grader::default().build_graph_with_stats(&path).unwrap();
    assert_eq!(2, graph.len());
    assert!(!graph.contains("Patient"));
    assert_eq!(
        BuildStats {
            applied: 1,
            malformed: 2,
            unrecognized: 1,
            missing_id: 0,
        },
        stats
    );
}

#[test]
fn test_every_referenced_name_is_a_node() {
    let g = build_graph(fixture("hospital_solution.json")).unwrap();
    for (_, record) in &g {
        for name in record.edges.iter().chain(record.attr.iter()) {
            assert!(g.contains(name), "{} is referenced but not a node", name);
        }
    }
    assert_eq!(13, g.len());
}

#[test]
fn test_build_graph_is_idempotent() {
    let path = fixture("hospital_solution.json");
    assert_eq!(build_graph(&path).unwrap(), build_graph(&path).unwrap());
}

#[test]
fn test_lowercase_names() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_export(
        dir.path(),
        "case.json",
        &["entity-attr Doctor->Name", "entity-attr DOCTOR->Phone"],
    );

    let grader = Grader::new(GradingConfig {
        name_case: NameCase::Lowercase,
        ..GradingConfig::default()
    })
    .unwrap();
    let g = grader.build_graph(&path).unwrap();
    assert_eq!(Some(&node(&[], &["name", "phone"])), g.node("doctor"));
    assert_eq!(3, g.len());
}

#[test]
fn test_input_errors() {
    let missing = fixture("does_not_exist.json");
    assert!(matches!(build_graph(&missing), Err(GradingError::Io { .. })));
    assert!(matches!(
        build_graph(fixture("truncated.json")),
        Err(GradingError::Json { .. })
    ));
    assert!(matches!(
        build_graph(fixture("missing_edges.json")),
        Err(GradingError::InvalidExport { .. })
    ));

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("edges_object.json");
    fs::write(&path, r#"{"nodes": [], "edges": {"id": "entity-attr A->b"}}"#).unwrap();
    assert!(matches!(
        build_graph(&path),
        Err(GradingError::InvalidExport { .. })
    ));
}

#[test]
fn test_load_reference_points() {
    let solution = load_reference(fixture("hospital_solution.json")).unwrap();
    assert_eq!(50.0, solution.points);

    let dir = tempfile::tempdir().unwrap();
    let path = write_export(dir.path(), "no_points.json", &["entity-attr A->b"]);
    assert_eq!(100.0, load_reference(&path).unwrap().points);

    let grader = Grader::new(GradingConfig {
        default_points: 20.0,
        ..GradingConfig::default()
    })
    .unwrap();
    assert_eq!(20.0, grader.load_reference(&path).unwrap().points);

    let negative = dir.path().join("negative.json");
    fs::write(&negative, r#"{"nodes": [], "edges": [], "points": -5}"#).unwrap();
    assert!(matches!(
        load_reference(&negative),
        Err(GradingError::InvalidPoints { .. })
    ));
}

#[test]
fn test_reference_graph_from_json() {
    let value = json!({
        "A": {"edges": [], "attr": ["x"]},
        "punkte": 30
    });
    let solution: ReferenceGraph = serde_json::from_value(value).unwrap();
    assert_eq!(30.0, solution.points);
    assert_eq!(Some(&node(&[], &["x"])), solution.graph.node("A"));

    let value = json!({"A": {"attr": ["x"]}});
    let solution: ReferenceGraph = serde_json::from_value(value).unwrap();
    assert_eq!(100.0, solution.points);

    let value = json!({"A": {"attr": ["x"]}, "points": 10, "punkte": 20});
    let err = serde_json::from_value::<ReferenceGraph>(value).unwrap_err();
    assert!(err.to_string().contains("both `points` and `punkte`"));
}

#[test]
fn test_reference_export_with_both_point_keys() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("both.json");
    fs::write(
        &path,
        r#"{"nodes": [], "edges": [], "points": 10, "punkte": 20}"#,
    )
    .unwrap();

    let err = load_reference(&path).unwrap_err();
    assert!(matches!(err, GradingError::InvalidExport { .. }));
    assert_eq!(3, err.exit_code() as i32);
    assert_eq!(
        json!({
            "error": {
                "code": 3,
                "type": "invalid_export",
                "message": err.to_string(),
            }
        }),
        err.to_json()
    );
}

#[test]
fn test_perfect_match() {
    let solution = reference(vec![("A", node(&[], &["x"]))], 100.0);
    let student = graph(vec![("A", node(&[], &["x"]))]);

    let result = score(&student, &solution);
    assert_eq!(100.0, result.achieved_points);
    assert_eq!(100.0, result.max_points);
    assert_eq!(Details::Identical, result.details);

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(
        json!({
            "Gesamtpunktzahl": 100.0,
            "Erreichbare_punktzahl": 100.0,
            "details": {"status": "identical"}
        }),
        json
    );
}

#[test]
fn test_fully_missing_entity() {
    let solution = reference(vec![("A", node(&[], &["x"]))], 100.0);
    let result = score(&CanonicalGraph::new(), &solution);

    assert_eq!(0.0, result.achieved_points);
    let detail = result.details.get("A").unwrap();
    assert_eq!(0.0, detail.score);
    assert!(matches!(detail.kind, DetailKind::Missing { .. }));
}

#[test]
fn test_partial_attribute_match() {
    let solution = reference(vec![("A", node(&[], &["name", "age"]))], 100.0);
    let student = graph(vec![("A", node(&[], &["name"]))]);

    let result = score(&student, &solution);
    let a = result.details.get("A").unwrap();
    let attr = match &a.kind {
        DetailKind::Nested { details } => details.get("attr").unwrap(),
        other => panic!("expected nested detail, got {:?}", other),
    };
    assert_eq!(0.5, attr.score);
    match &attr.kind {
        DetailKind::Collection { elements, .. } => {
            assert_eq!(Some(&1.0), elements.get("name"));
            assert_eq!(Some(&0.0), elements.get("age"));
        }
        other => panic!("expected collection detail, got {:?}", other),
    }
    // edges match, attr half: (1.0 + 0.5) / 2
    assert_relative_eq!(75.0, result.achieved_points);
}

#[test]
fn test_grade_hospital_perfect() {
    let solution = load_reference(fixture("hospital_solution.json")).unwrap();
    let grader = Grader::default();
    let (student, stats) = grader
        .build_graph_with_stats(&fixture("hospital_student_perfect.json"))
        .unwrap();

    assert_eq!(10, stats.applied);
    assert_eq!(1, stats.unrecognized);
    assert_eq!(1, stats.missing_id);

    let result = grader.score(&student, &solution);
    assert_eq!(50.0, result.achieved_points);
    assert_eq!(Details::Identical, result.details);
}

#[test]
fn test_grade_hospital_partial() {
    let solution = load_reference(fixture("hospital_solution.json")).unwrap();
    let student = build_graph(fixture("hospital_student_partial.json")).unwrap();
    let result = score(&student, &solution);

    // Patient.attr: Name matches, Birthdat ~ Birthdate, Address missing
    let patient_attr = (1.0 + 16.0 / 17.0) / 3.0;
    let patient = (1.0 + patient_attr) / 2.0;
    // Doctor, Name, DoctorID and treats match; 13 keys in the solution
    let expected = (4.0 + patient) / 13.0 * 50.0;
    assert_relative_eq!(expected, result.achieved_points, epsilon = 1e-9);
    assert_eq!(50.0, result.max_points);
    assert_relative_eq!(expected / 50.0, result.ratio(), epsilon = 1e-9);

    let status = |key: &str| result.details.get(key).map(|d| d.kind.status());
    assert_eq!(Some("missing"), status("Medicine"));
    assert_eq!(Some("missing"), status("prescribes"));
    assert_eq!(Some("extra"), status("Nurse"));
    assert_eq!(Some("nested"), status("Patient"));

    let json = serde_json::to_value(&result).unwrap();
    let patient_attr_json = &json["details"]["Patient"]["details"]["attr"];
    assert_eq!(json!({"Birthdat": "Birthdate"}), patient_attr_json["matched"]);

    let summary = result.summary();
    assert_eq!(16, summary.len());
    assert!(summary.iter().all(|row| (0.0..=1.0).contains(&row.score)));
}

#[test]
fn test_detail_json_shape() {
    let solution = reference(
        vec![("A", node(&[], &["x"])), ("B", node(&["A"], &[]))],
        10.0,
    );
    let student = graph(vec![("A", node(&[], &["x", "y"])), ("C", node(&[], &[]))]);

    let json = serde_json::to_value(score(&student, &solution)).unwrap();
    let details = &json["details"];
    assert_eq!("nested", details["A"]["status"]);
    assert_eq!("collection", details["A"]["details"]["attr"]["status"]);
    assert_eq!(json!(1.0), details["A"]["details"]["attr"]["elements"]["x"]);
    assert_eq!(json!(0.0), details["A"]["details"]["attr"]["elements"]["y"]);
    assert!(details["A"]["details"]["attr"].get("matched").is_none());
    assert_eq!("missing", details["B"]["status"]);
    assert_eq!(json!({"edges": ["A"], "attr": []}), details["B"]["solution_value"]);
    assert_eq!("extra", details["C"]["status"]);
    assert_eq!(json!(5.0), json["Gesamtpunktzahl"]);
}

#[test]
fn test_collection_norm_max() {
    let solution = reference(vec![("A", node(&[], &["name", "age"]))], 100.0);
    let student = graph(vec![("A", node(&[], &["name", "age", "zzz"]))]);

    assert_eq!(100.0, score(&student, &solution).achieved_points);

    let strict = Grader::new(GradingConfig {
        collection_norm: ScoreNorm::Max,
        ..GradingConfig::default()
    })
    .unwrap();
    // edges 1.0, attr 2/3
    assert_relative_eq!(
        (1.0 + 2.0 / 3.0) / 2.0 * 100.0,
        strict.score(&student, &solution).achieved_points
    );
}

#[test]
fn test_grade_files_isolates_failures() {
    let solution = load_reference(fixture("hospital_solution.json")).unwrap();
    let paths = vec![
        fixture("hospital_student_perfect.json"),
        fixture("truncated.json"),
        fixture("hospital_student_partial.json"),
    ];

    let outcomes = Grader::default().grade_files(&paths, &solution);
    assert_eq!(3, outcomes.len());
    assert_eq!(OutcomeStatus::Success, outcomes[0].status);
    assert_eq!(OutcomeStatus::Failed, outcomes[1].status);
    assert!(outcomes[1].grading.is_none());
    assert!(outcomes[1].message.is_some());
    assert_eq!("truncated.json", outcomes[1].filename);
    assert_eq!(OutcomeStatus::Success, outcomes[2].status);

    let json = serde_json::to_value(&outcomes).unwrap();
    assert_eq!("failed", json[1]["status"]);
    assert_eq!(json!(50.0), json[0]["grading"]["Gesamtpunktzahl"]);
}

#[test]
fn test_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("grading.toml");
    fs::write(
        &path,
        "default_points = 40.0\nname_case = \"lowercase\"\ncollection_norm = \"max\"\n",
    )
    .unwrap();

    let config = GradingConfig::load(&path).unwrap();
    assert_eq!(40.0, config.default_points);
    assert_eq!(NameCase::Lowercase, config.name_case);
    assert_eq!(ScoreNorm::Max, config.collection_norm);
    assert!(!config.case_sensitive);

    fs::write(&path, "default_points = -1.0\n").unwrap();
    assert!(matches!(
        GradingConfig::load(&path),
        Err(GradingError::Config { .. })
    ));

    fs::write(&path, "points = 10\n").unwrap();
    assert!(matches!(
        GradingConfig::load(&path),
        Err(GradingError::Config { .. })
    ));
}

#[test]
fn test_clinic_against_itself_with_renamed_attribute() {
    let solution = ReferenceGraph::with_default_points(clinic());
    let mut student = clinic();
    student.insert("Doctor", node(&[], &["Name", "DoctorId"]));
    student.remove("DoctorID");
    student.insert("DoctorId", node(&[], &[]));

    let result = score(&student, &solution);
    assert!(result.achieved_points > 80.0);
    assert!(result.achieved_points < 100.0);
    assert_eq!(
        Some("extra"),
        result.details.get("DoctorId").map(|d| d.kind.status())
    );
}
