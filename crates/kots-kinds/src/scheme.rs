/*
 * scheme.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! An explicit registry of decodable kinds.
//!
//! A [`Scheme`] maps `(group, version, kind)` to a decoder. Callers build
//! one (usually with [`Scheme::kots`]) and pass it to whatever needs to
//! decode documents; there is no process-wide registration.

use std::collections::HashMap;
use std::fmt;

use serde::de::DeserializeOwned;

use crate::application::Application;
use crate::config::Config;
use crate::config_values::ConfigValues;
use crate::error::{SchemeError, SchemeResult};
use crate::license::License;
use crate::meta::{Object, TypeMeta};

/// Identifies a registered kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupVersionKind {
    pub group: String,
    pub version: String,
    pub kind: String,
}

impl GroupVersionKind {
    pub fn new(group: impl Into<String>, version: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            version: version.into(),
            kind: kind.into(),
        }
    }

    /// Split an `apiVersion` string. The core group has no slash.
    pub fn from_type_meta(type_meta: &TypeMeta) -> Self {
        let (group, version) = match type_meta.api_version.split_once('/') {
            Some((group, version)) => (group, version),
            None => ("", type_meta.api_version.as_str()),
        };
        Self::new(group, version, type_meta.kind.clone())
    }

    pub fn api_version(&self) -> String {
        if self.group.is_empty() {
            self.version.clone()
        } else {
            format!("{}/{}", self.group, self.version)
        }
    }
}

impl fmt::Display for GroupVersionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, Kind={}", self.api_version(), self.kind)
    }
}

/// A decoded document of any registered kind.
#[derive(Debug, Clone, PartialEq)]
pub enum KotsObject {
    Config(Config),
    ConfigValues(ConfigValues),
    License(License),
    Application(Application),
}

impl KotsObject {
    pub fn kind(&self) -> &str {
        match self {
            KotsObject::Config(_) => Config::KIND,
            KotsObject::ConfigValues(_) => ConfigValues::KIND,
            KotsObject::License(_) => License::KIND,
            KotsObject::Application(_) => Application::KIND,
        }
    }

    pub fn into_config(self) -> Option<Config> {
        match self {
            KotsObject::Config(config) => Some(config),
            _ => None,
        }
    }

    pub fn into_config_values(self) -> Option<ConfigValues> {
        match self {
            KotsObject::ConfigValues(values) => Some(values),
            _ => None,
        }
    }

    pub fn into_license(self) -> Option<License> {
        match self {
            KotsObject::License(license) => Some(license),
            _ => None,
        }
    }

    pub fn into_application(self) -> Option<Application> {
        match self {
            KotsObject::Application(app) => Some(app),
            _ => None,
        }
    }
}

impl From<Config> for KotsObject {
    fn from(value: Config) -> Self {
        KotsObject::Config(value)
    }
}

impl From<ConfigValues> for KotsObject {
    fn from(value: ConfigValues) -> Self {
        KotsObject::ConfigValues(value)
    }
}

impl From<License> for KotsObject {
    fn from(value: License) -> Self {
        KotsObject::License(value)
    }
}

impl From<Application> for KotsObject {
    fn from(value: Application) -> Self {
        KotsObject::Application(value)
    }
}

/// Turns a YAML or JSON document into a [`KotsObject`].
pub type Decoder = fn(&str) -> Result<KotsObject, serde_yaml::Error>;

/// Decode `data` as `T`. Usable as a [`Decoder`] for any kind.
pub fn decode_as<T>(data: &str) -> Result<KotsObject, serde_yaml::Error>
where
    T: DeserializeOwned + Into<KotsObject>,
{
    serde_yaml::from_str::<T>(data).map(Into::into)
}

/// A registry of kinds and their decoders.
#[derive(Clone, Default)]
pub struct Scheme {
    decoders: HashMap<GroupVersionKind, Decoder>,
}

impl Scheme {
    /// An empty scheme that decodes nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// A scheme with every `kots.io/v1beta1` kind registered.
    pub fn kots() -> Self {
        let mut scheme = Self::new();
        scheme.register_object::<Config>();
        scheme.register_object::<ConfigValues>();
        scheme.register_object::<License>();
        scheme.register_object::<Application>();
        scheme
    }

    pub fn register(&mut self, gvk: GroupVersionKind, decoder: Decoder) {
        self.decoders.insert(gvk, decoder);
    }

    /// Register a kots kind under its own group version.
    pub fn register_object<T>(&mut self)
    where
        T: Object + DeserializeOwned + Into<KotsObject>,
    {
        self.register(
            GroupVersionKind::new(crate::GROUP, crate::VERSION, T::KIND),
            decode_as::<T>,
        );
    }

    pub fn recognizes(&self, gvk: &GroupVersionKind) -> bool {
        self.decoders.contains_key(gvk)
    }

    /// Decode a document, dispatching on its `apiVersion` and `kind`.
    pub fn decode(&self, data: &str) -> SchemeResult<KotsObject> {
        let type_meta: TypeMeta =
            serde_yaml::from_str(data).map_err(|source| SchemeError::InvalidDocument { source })?;
        if type_meta.kind.is_empty() {
            return Err(SchemeError::MissingKind);
        }

        let gvk = GroupVersionKind::from_type_meta(&type_meta);
        let decoder = self
            .decoders
            .get(&gvk)
            .ok_or_else(|| SchemeError::NotRegistered { gvk: gvk.clone() })?;
        decoder(data).map_err(|source| SchemeError::Decode { gvk, source })
    }
}

impl fmt::Debug for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut kinds: Vec<String> = self.decoders.keys().map(ToString::to_string).collect();
        kinds.sort();
        f.debug_struct("Scheme").field("kinds", &kinds).finish()
    }
}
