/// Invoice mutation pipeline
///
/// # Modules
///
/// - [`schema`]: Coercion and field validation of form submissions
/// - [`store`]: Persistence seam and storage-fault classification
/// - [`mutations`]: Create, update and delete with cache invalidation and navigation

pub mod mutations;
pub mod schema;
pub mod store;
