//! [`Query`] collection related to the multiple [`Client`]s.

use common::operations::By;

#[cfg(doc)]
use crate::Query;
use crate::{domain::Client, read};

use super::DatabaseQuery;

/// Queries a list of non-deleted [`Client`]s.
pub type List = DatabaseQuery<By<Vec<Client>, read::client::list::Filter>>;
