//! Core domain records shared by every stage of a match run.

mod company;
mod incentive;

pub use company::{CandidateCompany, CompanyId, CompanyRecord, LocatedCandidate};
pub use incentive::{Incentive, IncentiveId};
