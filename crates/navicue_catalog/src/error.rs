//! Catalog errors

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("unknown specimen '{0}'")]
    UnknownSpecimen(String),
}
