use circom_proofs_core::artifacts::{ArtifactKind, ArtifactLocator};
use circom_proofs_core::circuits::{self, MERKLE_PROOF, TALLY_PROOF};
use circom_proofs_core::config::Layout;
use circom_proofs_core::error::CircomProofsError;
use circom_proofs_core::generator::ProofGenerator;
use circom_proofs_core::harness::WitnessAssertionHarness;
use circom_proofs_core::mock::{self, MockBackend};
use circom_proofs_core::scenarios::{Expectation, Scenario};
use circom_proofs_core::store;
use circom_proofs_core::types::{Outcome, ProofInput, PublicSignals};
use circom_proofs_core::verifier::{ProofVerifier, VerifyOutcome};
use serde_json::json;
use tempfile::tempdir;

fn setup(dir: &std::path::Path, layout: Layout) -> ArtifactLocator {
    let locator = ArtifactLocator::new(dir, layout);
    for spec in circuits::ALL {
        mock::install_setup(&locator, spec.name).unwrap();
    }
    locator
}

#[tokio::test]
async fn round_trip_verifies_for_both_circuits_and_layouts() {
    for layout in [Layout::Nested, Layout::Flat] {
        let dir = tempdir().unwrap();
        let locator = setup(dir.path(), layout);
        let backend = MockBackend::new();
        let generator = ProofGenerator::new(locator.clone(), &backend);
        let verifier = ProofVerifier::new(locator.clone(), &backend);

        for spec in circuits::ALL {
            let bundle = generator
                .generate(spec.name, &spec.example_input())
                .await
                .unwrap();
            let direct = verifier
                .verify(spec.name, &bundle.proof, &bundle.public_signals)
                .await
                .unwrap();
            assert_eq!(direct, VerifyOutcome::Valid, "{} ({layout:?})", spec.name);

            let reloaded = verifier.verify_persisted(spec.name).await.unwrap();
            assert_eq!(reloaded, VerifyOutcome::Valid);
        }
    }
}

#[tokio::test]
async fn verification_is_idempotent() {
    let dir = tempdir().unwrap();
    let locator = setup(dir.path(), Layout::Nested);
    let backend = MockBackend::new();
    ProofGenerator::new(locator.clone(), &backend)
        .generate(TALLY_PROOF.name, &TALLY_PROOF.example_input())
        .await
        .unwrap();

    let verifier = ProofVerifier::new(locator.clone(), &backend);
    let first = verifier.verify_persisted(TALLY_PROOF.name).await.unwrap();
    let second = verifier.verify_persisted(TALLY_PROOF.name).await.unwrap();
    assert_eq!(first, second);

    // Same holds for a proof that does not verify.
    let d = locator.resolve(TALLY_PROOF.name);
    store::write_json(&vec!["1", "9"], d.public_path()).unwrap();
    let first = verifier.verify_persisted(TALLY_PROOF.name).await.unwrap();
    let second = verifier.verify_persisted(TALLY_PROOF.name).await.unwrap();
    assert_eq!(first, VerifyOutcome::Invalid);
    assert_eq!(first, second);
}

#[tokio::test]
async fn verify_before_prove_names_the_proof_file() {
    let dir = tempdir().unwrap();
    let locator = setup(dir.path(), Layout::Nested);
    let backend = MockBackend::new();

    let err = ProofVerifier::new(locator.clone(), &backend)
        .verify_persisted(MERKLE_PROOF.name)
        .await
        .unwrap_err();
    match err {
        CircomProofsError::MissingArtifact { kind, path } => {
            assert_eq!(kind, ArtifactKind::Proof);
            assert_eq!(path, locator.resolve(MERKLE_PROOF.name).proof_path());
        }
        other => panic!("expected MissingArtifact, got {other:?}"),
    }
}

#[tokio::test]
async fn verify_with_only_proof_names_the_public_file() {
    let dir = tempdir().unwrap();
    let locator = setup(dir.path(), Layout::Flat);
    let d = locator.resolve(MERKLE_PROOF.name);
    store::write_json(&json!({"pi_a": ["00"]}), d.proof_path()).unwrap();

    let backend = MockBackend::new();
    let err = ProofVerifier::new(locator, &backend)
        .verify_persisted(MERKLE_PROOF.name)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        CircomProofsError::MissingArtifact { kind: ArtifactKind::PublicSignals, .. }
    ));
}

#[tokio::test]
async fn tally_outcomes_match_the_vote_sum() {
    let backend = MockBackend::new();
    let harness = WitnessAssertionHarness::new(&backend, "src");
    let source = TALLY_PROOF.source_path(std::path::Path::new("src"));

    let cases = [
        (json!([1, 0, 1, 1, 0, 1, 0, 1, 1, 0]), 6, Outcome::Valid),
        (json!([1, 0, 1, 1, 0, 1, 0, 1, 1, 0]), 5, Outcome::Invalid),
        (json!([0, 0, 0, 0, 0, 0, 0, 0, 0, 0]), 0, Outcome::Valid),
        (json!([1, 1, 1, 1, 1, 1, 1, 1, 1, 1]), 10, Outcome::Valid),
        (json!([1, 1, 1, 1, 1, 1, 1, 1, 1, 1]), 9, Outcome::Invalid),
    ];
    for (votes, total, expected) in cases {
        let scenario = Scenario {
            name: "tally",
            input: ProofInput::new()
                .with("votes", votes)
                .with("expectedTotal", total),
            expectation: Expectation::Outcome(expected),
        };
        harness
            .assert_scenario(&source, TALLY_PROOF.output_slot, &scenario)
            .await
            .unwrap();
    }
}

#[tokio::test]
async fn merkle_witness_is_deterministic_across_runs() {
    let dir = tempdir().unwrap();
    let locator = setup(dir.path(), Layout::Nested);
    let backend = MockBackend::new();
    let generator = ProofGenerator::new(locator, &backend);
    let input = MERKLE_PROOF.example_input();

    let a = generator.generate(MERKLE_PROOF.name, &input).await.unwrap();
    let b = generator.generate(MERKLE_PROOF.name, &input).await.unwrap();
    assert_eq!(a.witness, b.witness);
    assert_eq!(a.public_signals, b.public_signals);
    assert_eq!(a.public_signals.0[0], a.witness.get(1).unwrap().to_string());
}

#[tokio::test]
async fn second_prove_wins() {
    let dir = tempdir().unwrap();
    let locator = setup(dir.path(), Layout::Nested);
    let backend = MockBackend::new();
    let generator = ProofGenerator::new(locator.clone(), &backend);

    let first = generator
        .generate(TALLY_PROOF.name, &TALLY_PROOF.example_input())
        .await
        .unwrap();
    let other_input = ProofInput::new()
        .with("votes", json!([0, 0, 0, 0, 0, 0, 0, 0, 0, 1]))
        .with("expectedTotal", 1);
    let second = generator
        .generate(TALLY_PROOF.name, &other_input)
        .await
        .unwrap();
    assert_ne!(first.public_signals, second.public_signals);

    let d = locator.resolve(TALLY_PROOF.name);
    let on_disk: PublicSignals =
        store::read_json(ArtifactKind::PublicSignals, d.public_path()).unwrap();
    assert_eq!(on_disk, second.public_signals);

    let verifier = ProofVerifier::new(locator, &backend);
    assert_eq!(
        verifier.verify_persisted(TALLY_PROOF.name).await.unwrap(),
        VerifyOutcome::Valid
    );
    // The first run's proof no longer matches what is on disk.
    assert_eq!(
        verifier
            .verify(TALLY_PROOF.name, &first.proof, &on_disk)
            .await
            .unwrap(),
        VerifyOutcome::Invalid
    );
}

#[tokio::test]
async fn proofs_from_an_old_setup_stop_verifying() {
    let dir = tempdir().unwrap();
    let locator = setup(dir.path(), Layout::Nested);
    let backend = MockBackend::new();
    ProofGenerator::new(locator.clone(), &backend)
        .generate(TALLY_PROOF.name, &TALLY_PROOF.example_input())
        .await
        .unwrap();

    mock::install_setup(&locator, TALLY_PROOF.name).unwrap();
    let outcome = ProofVerifier::new(locator, &backend)
        .verify_persisted(TALLY_PROOF.name)
        .await
        .unwrap();
    assert_eq!(outcome, VerifyOutcome::Invalid);
}
