//! Batch driver end to end over the in-memory store.

mod common;

use matcher::batch::{BatchOptions, BatchRunner, SkipList};
use matcher::domain::Incentive;
use matcher::orchestrator::MatchConfig;
use matcher::store::IncentiveStore;
use tempfile::TempDir;

use common::harness::{Pipeline, incentive};

fn runner(pipeline: &Pipeline, dir: &TempDir) -> BatchRunner {
    BatchRunner::new(
        pipeline.orchestrator(MatchConfig::default()),
        pipeline.store.clone(),
        pipeline.store.clone(),
        SkipList::load(dir.path().join("skipped_incentives.json")).unwrap(),
    )
}

#[tokio::test]
async fn test_batch_processes_pending_and_builds_reverse_index() {
    let dir = TempDir::new().unwrap();
    let pipeline = Pipeline::seeded(30)
        .with_incentive(incentive("INC-1"))
        .with_incentive(incentive("INC-2"))
        .with_incentive(Incentive::new("INC-3", "Aviso sem descrição"));

    let summary = runner(&pipeline, &dir)
        .run(&BatchOptions::default())
        .await
        .unwrap();

    assert_eq!(summary.succeeded, 2);
    assert_eq!(summary.failed, 0);
    assert_eq!(summary.skipped, 0);
    assert!(pipeline.store.result("INC-3").is_none());

    let index = pipeline.store.reverse_index();
    assert_eq!(summary.reverse_index_companies, Some(index.len()));
    for entries in index.values() {
        assert!(entries.len() <= 5);
        assert!(entries.windows(2).all(|w| w[0].company_score >= w[1].company_score));
    }

    let progress = pipeline.store.progress().await.unwrap();
    assert_eq!(progress.total, 3);
    assert_eq!(progress.processable, 2);
    assert_eq!(progress.remaining(), 0);
    assert!(pipeline.store.pending_incentives().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_second_batch_has_nothing_to_do() {
    let dir = TempDir::new().unwrap();
    let pipeline = Pipeline::seeded(20).with_incentive(incentive("INC-1"));

    let mut runner = runner(&pipeline, &dir);
    runner.run(&BatchOptions::default()).await.unwrap();
    let saves = pipeline.store.match_saves();

    let summary = runner.run(&BatchOptions::default()).await.unwrap();

    assert_eq!(summary.attempted(), 0);
    assert_eq!(pipeline.store.match_saves(), saves);
}

#[tokio::test]
async fn test_incentive_without_eligible_companies_lands_on_skip_list() {
    let dir = TempDir::new().unwrap();
    // Only even ids are indexed and only odd ids are eligible.
    let pipeline = Pipeline::seeded(0).with_incentive(incentive("INC-1"));
    for id in (2..=20).step_by(2) {
        pipeline.store.insert_company(common::harness::company(id));
        pipeline.index.insert(
            common::harness::COLLECTION,
            id,
            vec![1.0; 384],
            Default::default(),
        );
    }

    let summary = runner(&pipeline, &dir)
        .run(&BatchOptions::default())
        .await
        .unwrap();

    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.succeeded, 0);
    let stored = SkipList::load(dir.path().join("skipped_incentives.json")).unwrap();
    assert!(stored.contains("INC-1"));
}
