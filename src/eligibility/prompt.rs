use std::fmt::Write;

use crate::domain::LocatedCandidate;

const NUTS_II_REGIONS: &str = "Norte, Centro, Lisboa, Alentejo, Algarve, Açores, Madeira";

/// Builds the eligibility prompt for candidates that already have a trusted address.
pub fn build_prompt(requirement: &str, candidates: &[&LocatedCandidate]) -> String {
    let mut companies = String::new();
    for candidate in candidates {
        let address = candidate.location.address().unwrap_or_default();
        // Writing to a String cannot fail.
        let _ = writeln!(
            companies,
            "Company {} ({}): {}",
            candidate.id(),
            candidate.company.name(),
            address
        );
    }

    format!(
        "Decide whether each company is located inside the geographic area \"{requirement}\" of Portugal.\n\
         \n\
         NUTS II regions: {NUTS_II_REGIONS}\n\
         \"Nacional\" means anywhere in Portugal.\n\
         \n\
         Companies:\n\
         {companies}\n\
         Return JSON only, using the numeric company id as key: {{\"<company_id>\": true/false, ...}}\n\
         \n\
         JSON:"
    )
}
