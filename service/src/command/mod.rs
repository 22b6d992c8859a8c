//! [`Command`] definition.

pub mod authenticate_employee;
pub mod create_category;
pub mod create_client;
pub mod create_employee;
pub mod create_equipment;
pub mod delete_client;
pub mod delete_equipment;
pub mod open_rental;
pub mod process_return;
pub mod update_client;
pub mod update_employee;
pub mod update_equipment;

/// [`Command`] of the [`Service`].
///
/// [`Service`]: crate::Service
pub use common::Handler as Command;

pub use self::{
    authenticate_employee::AuthenticateEmployee,
    create_category::CreateCategory, create_client::CreateClient,
    create_employee::CreateEmployee, create_equipment::CreateEquipment,
    delete_client::DeleteClient, delete_equipment::DeleteEquipment,
    open_rental::OpenRental, process_return::ProcessReturn,
    update_client::UpdateClient, update_employee::UpdateEmployee,
    update_equipment::UpdateEquipment,
};
