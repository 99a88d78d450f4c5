//! Fixture builders shared by unit tests.

use crate::domain::{CandidateCompany, CompanyId, CompanyRecord, Incentive, LocatedCandidate};
use crate::location::{LocationRecord, LocationStatus};

pub fn company(id: CompanyId, name: &str) -> CompanyRecord {
    CompanyRecord::new(id, name)
        .with_category("Fabricação de mobiliário")
        .with_activity("Produção de móveis de madeira")
        .with_website("https://example.pt")
}

pub fn candidate(id: CompanyId, name: &str, score: f32) -> CandidateCompany {
    CandidateCompany::new(company(id, name), score)
}

pub fn lisbon(id: CompanyId) -> LocationRecord {
    LocationRecord::resolved(id, 38.7223, -9.1393, "Avenida da Liberdade 1, Lisboa")
}

pub fn located(
    id: CompanyId,
    name: &str,
    score: f32,
    location: LocationRecord,
) -> LocatedCandidate {
    LocatedCandidate {
        company: candidate(id, name, score),
        location,
    }
}

pub fn located_ok(id: CompanyId, score: f32) -> LocatedCandidate {
    located(id, &format!("Empresa {id} Lda"), score, lisbon(id))
}

pub fn located_failed(id: CompanyId, status: LocationStatus) -> LocatedCandidate {
    located(
        id,
        &format!("Empresa {id} Lda"),
        0.5,
        LocationRecord::unresolved(id, status),
    )
}

pub fn incentive(id: &str) -> Incentive {
    Incentive::new(id, "Apoio à modernização industrial")
        .with_sector("Indústria transformadora")
        .with_geo_requirement("Lisboa")
        .with_eligible_actions("Aquisição de equipamento produtivo")
        .with_description("Financiamento de investimento produtivo")
}

/// JSON object marking every id as `value`.
pub fn verdicts(ids: &[CompanyId], value: bool) -> String {
    let entries: Vec<String> = ids.iter().map(|id| format!("\"{id}\": {value}")).collect();
    format!("{{{}}}", entries.join(", "))
}
