//! In-memory pipeline wired from the crate's mock collaborators.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use matcher::domain::{CompanyId, CompanyRecord, Incentive};
use matcher::eligibility::GeoEligibilityFilter;
use matcher::embedding::{CrossEncoder, QueryEmbedder, SentenceEncoder};
use matcher::geocoding::{GeocodingConfig, MockGeocoder};
use matcher::location::{LocationCache, LocationResolver};
use matcher::orchestrator::{MatchConfig, MatchingOrchestrator};
use matcher::reasoning::ScriptedReasoner;
use matcher::rerank::CandidateReranker;
use matcher::retrieval::CandidateRetriever;
use matcher::scoring::CompanyScorer;
use matcher::store::MemoryStore;
use matcher::vectordb::MockVectorIndex;

pub const COLLECTION: &str = "companies";

const ACTIVITIES: &[(&str, &str)] = &[
    ("Fabricação de mobiliário", "Produção de móveis de madeira maciça"),
    ("Comércio a retalho", "Venda de artigos de desporto"),
    ("Atividades de engenharia", "Projetos de instalações industriais"),
    ("Restauração", "Restaurante e serviços de catering"),
    ("Fabricação de máquinas", "Equipamento para a indústria alimentar"),
];

pub fn company(id: CompanyId) -> CompanyRecord {
    let (category, activity) = ACTIVITIES[id as usize % ACTIVITIES.len()];
    let form = if id % 3 == 0 { "S.A." } else { "Lda" };
    let record = CompanyRecord::new(id, format!("Empresa {id} {form}"))
        .with_category(category)
        .with_activity(activity)
        .with_address_hint("Lisboa");
    if id % 2 == 0 {
        record.with_website(format!("https://empresa{id}.pt"))
    } else {
        record
    }
}

pub fn incentive(id: &str) -> Incentive {
    Incentive::new(id, "Inovação produtiva na indústria transformadora")
        .with_sector("Indústria transformadora")
        .with_geo_requirement("Lisboa")
        .with_eligible_actions("Aquisição de máquinas e equipamento produtivo")
        .with_description("Apoio ao investimento em capacidade produtiva")
}

pub struct Pipeline {
    pub store: Arc<MemoryStore>,
    pub index: Arc<MockVectorIndex>,
    pub geocoder: Arc<MockGeocoder>,
    pub reasoner: Arc<ScriptedReasoner>,
    encoder: Arc<SentenceEncoder>,
}

impl Pipeline {
    /// `companies` companies indexed by stub embeddings of their description. Odd ids are
    /// eligible; the delegated final score is `0.5 + id / 100`.
    pub fn seeded(companies: CompanyId) -> Self {
        let encoder = Arc::new(SentenceEncoder::stub().expect("stub encoder"));
        let store = MemoryStore::new();
        let index = MockVectorIndex::new();

        for id in 1..=companies {
            let record = company(id);
            let text = format!(
                "{} {}",
                record.category_label.as_deref().unwrap_or_default(),
                record.activity.as_deref().unwrap_or_default()
            );
            let vector = encoder.embed(&text).expect("stub embedding");
            index.insert(
                COLLECTION,
                id,
                vector,
                HashMap::from([("name".to_string(), record.name.clone())]),
            );
            store.insert_company(record);
        }

        Self {
            store: Arc::new(store),
            index: Arc::new(index),
            geocoder: Arc::new(MockGeocoder::new().with_default_place(
                38.7223,
                -9.1393,
                "Avenida da Liberdade 1, Lisboa",
            )),
            reasoner: Arc::new(ScriptedReasoner::simulating(
                |id| id % 2 == 1,
                |id| 0.5 + id as f64 / 100.0,
            )),
            encoder,
        }
    }

    pub fn with_incentive(self, incentive: Incentive) -> Self {
        self.store.insert_incentive(incentive);
        self
    }

    pub fn orchestrator(&self, config: MatchConfig) -> MatchingOrchestrator {
        let retriever = CandidateRetriever::new(self.encoder.clone(), self.index.clone(), COLLECTION);
        let reranker = CandidateReranker::new(Some(Arc::new(
            CrossEncoder::stub().expect("stub reranker"),
        )));
        let resolver = LocationResolver::new(
            LocationCache::unbounded(),
            self.store.clone(),
            self.geocoder.clone(),
            GeocodingConfig::default().with_rate_limit_backoff(Duration::from_millis(1)),
        );

        MatchingOrchestrator::new(
            retriever,
            self.store.clone(),
            reranker,
            Arc::new(resolver),
            GeoEligibilityFilter::new(self.reasoner.clone()),
            CompanyScorer::new(self.reasoner.clone()),
            self.store.clone(),
            config,
        )
        .expect("valid match config")
    }
}
