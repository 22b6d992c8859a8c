//! [`Query`] collection related to a single [`ReturnRecord`].

use common::operations::By;

#[cfg(doc)]
use crate::{domain::Rental, Query};
use crate::domain::{rental, ReturnRecord};

use super::DatabaseQuery;

/// Queries a [`ReturnRecord`] of the [`Rental`] with the provided
/// [`rental::Id`].
pub type ByRentalId = DatabaseQuery<By<Option<ReturnRecord>, rental::Id>>;
