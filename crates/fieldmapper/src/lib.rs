//! # fieldmapper
//!
//! Generate mapping functions from one struct to others that share most of
//! its fields.
//!
//! For every target listed in `#[mapper(..)]`, the origin gets a method
//! `mapTo<Target>`. Target fields with no origin field of the same name and
//! type come first as required arguments. Every other field follows as an
//! `Option`, and `None` reuses the origin's value.
//!
//! # Example
//! ```
//!   use fieldmapper::mappers;
//!
//!   mappers! {
//!     #[mapper(UserDto, AuditEntry)]
//!     pub struct User {
//!       pub id: i64,
//!       pub name: String,
//!     }
//!
//!     pub struct UserDto {
//!       pub id: i64,
//!       pub name: String,
//!       pub admin: bool,
//!     }
//!
//!     pub struct AuditEntry {
//!       pub id: i64,
//!       pub name: Option<String>,
//!     }
//!   }
//!
//!   let user = User { id: 7, name: "ferris".to_string() };
//!
//!   let dto = user.mapToUserDto(true, None, None);
//!   assert_eq!((dto.id, dto.name.as_str(), dto.admin), (7, "ferris", true));
//!
//!   let dto = user.mapToUserDto(false, None, Some("crab".to_string()));
//!   assert_eq!(dto.name, "crab");
//!
//!   // `name` changed type, so it is required.
//!   let entry = user.mapToAuditEntry(None, None);
//!   assert_eq!((entry.id, entry.name), (7, None));
//! ```
//!
//! Build scripts can generate the same methods for regular source files with
//! `fieldmapper-build`; mark origins there with [`macro@mapper`].

pub use fieldmapper_codegen::{mapper, mappers};
