//! Job Search Gateway — proxies the Reed job board API and normalizes
//! results into the uniform job record the frontend consumes.

pub mod handlers;
pub mod normalize;
pub mod reed;
