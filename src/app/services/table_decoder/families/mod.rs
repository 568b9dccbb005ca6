//! Shipped layouts of each table family
//!
//! Column positions follow the platform's import templates. Each layout is
//! plain data handed to the generic row decoder; changing a template means
//! editing one builder chain here.

pub mod candidate;
pub mod company;
pub mod job_posting;
pub mod send_target;

use super::schema::ColumnSchema;
use crate::app::models::TableFamily;
use crate::Result;

/// Build the column schema of a table family
pub fn schema_for(family: TableFamily) -> Result<ColumnSchema> {
    match family {
        TableFamily::Company => company::schema(),
        TableFamily::JobPosting => job_posting::schema(),
        TableFamily::Candidate => candidate::schema(),
        TableFamily::SendTarget => send_target::schema(),
    }
}
