//! Transfer objects between the wire and the entity layer
//!
//! Inbound DTOs are built with `from_request` from loose JSON and checked
//! with `validate()`. Outbound DTOs project a model to a public, admin or
//! list-item shape for one [`Localization`].

pub mod input;
pub mod localized;
pub mod oeuvre_dto;
pub mod taxonomy_dto;
pub mod user_dto;
pub mod validation;

pub use input::{AliasTable, RawInput};
pub use localized::{LocalizedText, Localization};
pub use oeuvre_dto::{
    CreateOeuvreDto, OeuvreAdminDto, OeuvreListItemDto, OeuvrePublicDto, UpdateOeuvreDto,
};
pub use taxonomy_dto::{CreateTaxonomyDto, TaxonomyDto};
pub use user_dto::{
    OwnerSummaryDto, RegisterUserDto, SuspensionDto, UpdateUserDto, UserAdminDto,
    UserListItemDto, UserPublicDto,
};
pub use validation::{FieldError, ValidationResult};
