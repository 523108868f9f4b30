/*
 * lib.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Custom resource kinds of the `kots.io/v1beta1` group.
//!
//! The structs mirror the CRD schemas field for field so documents survive
//! a decode/encode round trip (minus comments and key order). Decoding by
//! `apiVersion`/`kind` goes through an explicitly constructed [`Scheme`].

pub mod application;
pub mod config;
pub mod config_values;
pub mod error;
pub mod license;
pub mod meta;
pub mod scheme;

pub use application::{Application, ApplicationPort, ApplicationSpec};
pub use config::{
    Config, ConfigChildItem, ConfigGroup, ConfigItem, ConfigItemValidation, ConfigSpec,
    RegexValidator,
};
pub use config_values::{ConfigValue, ConfigValues, ConfigValuesSpec};
pub use error::{SchemeError, SchemeResult};
pub use license::{EntitlementField, EntitlementValue, License, LicenseSpec};
pub use meta::{Object, ObjectMeta, TypeMeta};
pub use scheme::{Decoder, GroupVersionKind, KotsObject, Scheme, decode_as};

pub const GROUP: &str = "kots.io";
pub const VERSION: &str = "v1beta1";
pub const API_VERSION: &str = "kots.io/v1beta1";
