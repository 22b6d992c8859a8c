//! [`Query`] collection related to the multiple [`ReturnRecord`]s.

use common::operations::By;

use crate::domain::ReturnRecord;
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries all [`ReturnRecord`]s, newest first.
pub type List = DatabaseQuery<By<Vec<ReturnRecord>, ()>>;
