//! [`Query`] collection related to the multiple [`Category`]s.

use common::operations::By;

use crate::domain::Category;
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries all [`Category`]s ordered by their names.
pub type List = DatabaseQuery<By<Vec<Category>, ()>>;
