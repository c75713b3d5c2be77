//! Infrastructure layer: adapters for the domain traits and the services
//! that drive them

pub mod classification;
pub mod crag;
pub mod dataset;
pub mod embedding;
pub mod evidence;
pub mod llm;
pub mod logging;
pub mod results;
pub mod services;
