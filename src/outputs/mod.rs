//! Output generation for run reports and evaluations.
//!
//! # Submodules
//!
//! - [`json`]: writes [`RunReport`](crate::models::RunReport)s and evaluation
//!   reports to JSON files
//! - [`table`]: renders the per-source summary as a plain terminal table
//!
//! # Output Structure
//!
//! ```text
//! json_output_dir/
//! ├── 2025-05-06/
//! │   ├── morning.json
//! │   ├── afternoon.json
//! │   └── evening.json
//!
//! report_dir/
//! └── evaluation_20250506_141503.json
//! ```

pub mod json;
pub mod table;
