// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod export;
pub mod feedback;
pub mod filter;
pub mod forms;
pub mod host;
pub mod ids;
pub mod model;
pub mod pagination;
mod personal;
pub mod state;

pub use export::CsvDownload;
pub use forms::FormIssue;
pub use host::*;
pub use ids::*;
pub use model::*;
pub use state::*;
