//! Handler state: the loaded configuration and the initialized feature slices.

use crate::domain::config::ApiConfig;
use crate::domain::registry::{FeatureSlice, InitializedSlice};
use fxhash::FxHashMap;
use std::any::TypeId;
use std::borrow::Cow;
use std::ops::Deref;
use std::sync::Arc;

#[catmash_derive::catmash_error]
pub enum ApiStateError {
    #[error("Invalid API state{}: {message}", format_context(.context))]
    Validation { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
    #[error("Feature slice not registered{}: {message}", format_context(.context))]
    MissingSlice { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

#[derive(Debug)]
pub struct ApiStateInner {
    pub config: ApiConfig,
    slices: FxHashMap<TypeId, InitializedSlice>,
}

/// Cheap to clone; every handler sees the same slices.
#[derive(Debug, Clone)]
pub struct ApiState {
    inner: Arc<ApiStateInner>,
}

impl ApiState {
    #[must_use]
    pub fn builder() -> ApiStateBuilder {
        ApiStateBuilder::default()
    }

    /// # Errors
    /// [`ApiStateError::MissingSlice`] if no slice of type `T` was registered.
    pub fn try_get_slice<T: FeatureSlice>(&self) -> Result<&T, ApiStateError> {
        self.inner
            .slices
            .get(&TypeId::of::<T>())
            .and_then(InitializedSlice::downcast_ref::<T>)
            .ok_or_else(|| ApiStateError::MissingSlice {
                message: std::any::type_name::<T>().into(),
                context: None,
            })
    }
}

impl Deref for ApiState {
    type Target = ApiStateInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

#[derive(Debug, Default)]
pub struct ApiStateBuilder {
    config: Option<ApiConfig>,
    slices: Vec<InitializedSlice>,
}

impl ApiStateBuilder {
    #[must_use]
    pub fn config(mut self, config: ApiConfig) -> Self {
        self.config = Some(config);
        self
    }

    #[must_use]
    pub fn register_slice(mut self, slice: InitializedSlice) -> Self {
        self.slices.push(slice);
        self
    }

    /// # Errors
    /// [`ApiStateError::Validation`] if no configuration was supplied or the same
    /// slice type was registered twice.
    pub fn build(self) -> Result<ApiState, ApiStateError> {
        let Some(config) = self.config else {
            return Err(ApiStateError::Validation {
                message: "ApiConfig not provided".into(),
                context: None,
            });
        };

        let mut slices = FxHashMap::default();
        for slice in self.slices {
            if slices.contains_key(&slice.id) {
                return Err(ApiStateError::Validation {
                    message: format!("slice {:?} registered twice", slice.id).into(),
                    context: None,
                });
            }
            slices.insert(slice.id, slice);
        }

        Ok(ApiState { inner: Arc::new(ApiStateInner { config, slices }) })
    }
}
