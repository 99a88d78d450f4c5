//! Incentive matcher entrypoint.

use std::process::ExitCode;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::Context;
use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;
use tokio::signal;

use matcher::batch::{BatchOptions, BatchRunner, SkipList};
use matcher::config::Config;
use matcher::eligibility::GeoEligibilityFilter;
use matcher::embedding::{CrossEncoder, EncoderConfig, RerankerConfig, SentenceEncoder};
use matcher::geocoding::{GeocodingConfig, GooglePlacesGeocoder};
use matcher::location::{LocationCache, LocationResolver};
use matcher::orchestrator::{MatchConfig, MatchingOrchestrator};
use matcher::reasoning::GenaiReasoner;
use matcher::rerank::CandidateReranker;
use matcher::retrieval::CandidateRetriever;
use matcher::scoring::CompanyScorer;
use matcher::store::{IncentiveStore, PgStore, rebuild_reverse_index};
use matcher::vectordb::QdrantIndex;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[derive(Debug, Parser)]
#[command(name = "matcher", version, about = "Match funding incentives to eligible companies")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Process every incentive that still lacks a scored result.
    Run {
        #[arg(long, default_value_t = 0)]
        offset: usize,
        #[arg(long)]
        limit: Option<usize>,
        /// Also retry incentives on the skip-list.
        #[arg(long)]
        include_skipped: bool,
        /// Override MATCHER_MAX_CANDIDATES for this run.
        #[arg(long)]
        max_candidates: Option<usize>,
    },
    /// Match a single incentive.
    Match { incentive_id: String },
    /// Rebuild the per-company reverse index from stored rankings.
    RebuildIndex,
    /// Print processing progress.
    Status,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut config = Config::from_env()?;
    if let Command::Run {
        max_candidates: Some(max),
        ..
    } = &cli.command
    {
        config.max_candidates = *max;
    }
    config.validate()?;

    let store = Arc::new(PgStore::connect(config.require_database_url()?).await?);
    store.ensure_schema().await?;

    match cli.command {
        Command::Run {
            offset,
            limit,
            include_skipped,
            ..
        } => {
            let orchestrator = build_orchestrator(&config, store.clone()).await?;
            let skip_list = SkipList::load(config.skip_list_path.clone())?;
            let mut runner = BatchRunner::new(orchestrator, store.clone(), store, skip_list);

            tokio::spawn(cancel_on_signal(runner.cancel_handle()));

            let options = BatchOptions {
                offset,
                limit,
                include_skipped,
            };
            let summary = runner.run(&options).await?;
            println!(
                "succeeded: {}  failed: {}  skipped: {}{}  ({:.1}s)",
                summary.succeeded,
                summary.failed,
                summary.skipped,
                if summary.cancelled { "  [cancelled]" } else { "" },
                summary.elapsed.as_secs_f64()
            );
            Ok(summary.exit_code())
        }
        Command::Match { incentive_id } => {
            let incentive = store
                .fetch_incentive(&incentive_id)
                .await?
                .with_context(|| format!("incentive {incentive_id} not found"))?;
            let orchestrator = build_orchestrator(&config, store).await?;

            let outcome = orchestrator.run(&incentive).await?;
            tracing::info!(
                incentive_id = %incentive.id,
                companies = outcome.company_count(),
                iterations = outcome.iterations,
                candidates_tried = outcome.candidates_tried,
                geocoding_calls = outcome.geocoding_calls,
                "Match complete"
            );
            for company in &outcome.result.scored_ranking {
                println!(
                    "{:>2}. {:<8} {:<50} {}",
                    company.rank,
                    company.id,
                    company.name,
                    company
                        .company_score
                        .map(|s| format!("{s:.3}"))
                        .unwrap_or_else(|| "-".to_string())
                );
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::RebuildIndex => {
            let companies = rebuild_reverse_index(store.as_ref()).await?;
            println!("reverse index rebuilt for {companies} companies");
            Ok(ExitCode::SUCCESS)
        }
        Command::Status => {
            let progress = store.progress().await?;
            let skip_list = SkipList::load(config.skip_list_path.clone())?;
            println!("total incentives:       {}", progress.total);
            println!("processable:            {}", progress.processable);
            println!(
                "processed:              {} ({:.1}%)",
                progress.processed,
                progress.percent_complete()
            );
            println!("remaining:              {}", progress.remaining());
            println!("processed last 24h:     {}", progress.processed_last_24h);
            if let Some(secs) = progress.average_processing_secs {
                println!("avg processing time:    {secs:.1}s");
            }
            println!("skipped:                {}", skip_list.len());
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn build_orchestrator(
    config: &Config,
    store: Arc<PgStore>,
) -> anyhow::Result<MatchingOrchestrator> {
    let embedder_path = config.require_embedder_path()?;
    config.require_geocoding_api_key()?;

    let encoder = SentenceEncoder::load(EncoderConfig::new(embedder_path.to_path_buf()))?;

    let index = QdrantIndex::new(&config.qdrant_url)?;
    index
        .ensure_compatible(&config.collection, encoder.embedding_dim())
        .await
        .with_context(|| format!("collection {} at {}", config.collection, index.url()))?;

    let retriever = CandidateRetriever::new(Arc::new(encoder), Arc::new(index), &config.collection);

    let reranker = match &config.reranker_path {
        Some(_) => match CrossEncoder::load(RerankerConfig::from_config(config)) {
            Ok(model) => CandidateReranker::new(Some(Arc::new(model))),
            Err(e) => {
                tracing::warn!(error = %e, "Reranker failed to load, keeping retrieval order");
                CandidateReranker::disabled()
            }
        },
        None => {
            tracing::warn!("No MATCHER_RERANKER_PATH configured, keeping retrieval order");
            CandidateReranker::disabled()
        }
    };

    let geocoding = GeocodingConfig::from_config(config);
    let geocoder = GooglePlacesGeocoder::new(geocoding.clone())?;
    let resolver = LocationResolver::new(
        LocationCache::from_capacity(config.location_cache_capacity),
        store.clone(),
        Arc::new(geocoder),
        geocoding,
    );

    let reasoner = Arc::new(GenaiReasoner::new(&config.reasoning_model));

    Ok(MatchingOrchestrator::new(
        retriever,
        store.clone(),
        reranker,
        Arc::new(resolver),
        GeoEligibilityFilter::new(reasoner.clone()),
        CompanyScorer::new(reasoner),
        store,
        MatchConfig::from_config(config),
    )?)
}

async fn cancel_on_signal(cancel: Arc<AtomicBool>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, stopping after the current incentive");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, stopping after the current incentive");
        }
    }

    cancel.store(true, Ordering::Release);
}
