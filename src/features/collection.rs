//! Ordered, kind-keyed capability registry.
//!
//! # Design Decisions
//! - Insertion order is preserved; overwriting a kind keeps its position
//! - Every mutation bumps `revision`, so holders of cached lookups can tell
//!   the set changed
//! - Lookups that miss fall through to the server-level defaults; the
//!   defaults are never copied into the per-request set

use std::fmt;
use std::sync::{Arc, RwLock};
use std::vec;

use super::{Feature, FeatureKind, FeatureType};
use crate::error::{BridgeError, BridgeResult};
use crate::sync;

struct Inner {
    entries: Vec<(FeatureKind, Feature)>,
    revision: u64,
}

pub struct FeatureSet {
    inner: RwLock<Inner>,
    defaults: Option<Arc<FeatureSet>>,
    read_only: bool,
}

impl Default for FeatureSet {
    fn default() -> Self {
        Self::new()
    }
}

impl FeatureSet {
    /// Empty, writable set at revision 0.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                entries: Vec::new(),
                revision: 0,
            }),
            defaults: None,
            read_only: false,
        }
    }

    /// Empty set whose lookups fall back to `defaults`.
    pub fn with_defaults(defaults: Arc<FeatureSet>) -> Self {
        Self {
            defaults: Some(defaults),
            ..Self::new()
        }
    }

    /// Set pre-populated with modelled capabilities, one write per entry.
    pub(crate) fn build(
        features: Vec<Feature>,
        defaults: Option<Arc<FeatureSet>>,
        read_only: bool,
    ) -> Self {
        let entries: Vec<(FeatureKind, Feature)> = features
            .into_iter()
            .filter_map(|feature| {
                let kind = match &feature {
                    Feature::Request(_) => FeatureKind::Request,
                    Feature::RequestIdentifier(_) => FeatureKind::RequestIdentifier,
                    Feature::Response(_) => FeatureKind::Response,
                    Feature::Other(_) => return None,
                };
                Some((kind, feature))
            })
            .collect();
        let revision = entries.len() as u64;

        Self {
            inner: RwLock::new(Inner { entries, revision }),
            defaults,
            read_only,
        }
    }

    /// Typed lookup.
    pub fn get<T: FeatureType>(&self) -> Option<T> {
        self.get_by_kind(T::KIND)
            .and_then(|feature| T::from_feature(&feature))
    }

    /// Untyped lookup, falling back to the defaults.
    pub fn get_by_kind(&self, kind: FeatureKind) -> Option<Feature> {
        let local = sync::read(&self.inner)
            .entries
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, feature)| feature.clone());

        local.or_else(|| {
            self.defaults
                .as_ref()
                .and_then(|defaults| defaults.get_by_kind(kind))
        })
    }

    /// Typed store. Replaces any existing entry of the same kind.
    pub fn set<T: FeatureType>(&self, instance: T) -> BridgeResult<()> {
        self.insert(T::KIND, Some(instance.into_feature()))
    }

    /// Store `feature` under `kind`, or remove the entry when `None`.
    pub fn insert(&self, kind: FeatureKind, feature: Option<Feature>) -> BridgeResult<()> {
        if self.read_only {
            return Err(BridgeError::ReadOnlyFeatures);
        }
        if let Some(feature) = &feature {
            if !feature.implements(kind) {
                return Err(BridgeError::FeatureMismatch { kind });
            }
        }

        let mut inner = sync::write(&self.inner);
        let position = inner.entries.iter().position(|(k, _)| *k == kind);
        match (position, feature) {
            (Some(index), Some(feature)) => inner.entries[index].1 = feature,
            (None, Some(feature)) => inner.entries.push((kind, feature)),
            (Some(index), None) => {
                inner.entries.remove(index);
            }
            (None, None) => return Ok(()),
        }
        inner.revision += 1;

        tracing::trace!(kind = %kind, revision = inner.revision, "Feature set updated");
        Ok(())
    }

    pub fn revision(&self) -> u64 {
        sync::read(&self.inner).revision
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Entries held by this set; defaults are not counted.
    pub fn len(&self) -> usize {
        sync::read(&self.inner).entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn defaults(&self) -> Option<&Arc<FeatureSet>> {
        self.defaults.as_ref()
    }

    /// Snapshot of the local entries in insertion order.
    pub fn iter(&self) -> vec::IntoIter<(FeatureKind, Feature)> {
        sync::read(&self.inner).entries.clone().into_iter()
    }
}

impl<'a> IntoIterator for &'a FeatureSet {
    type Item = (FeatureKind, Feature);
    type IntoIter = vec::IntoIter<(FeatureKind, Feature)>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Debug for FeatureSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = sync::read(&self.inner);
        let kinds: Vec<FeatureKind> = inner.entries.iter().map(|(k, _)| *k).collect();
        f.debug_struct("FeatureSet")
            .field("kinds", &kinds)
            .field("revision", &inner.revision)
            .field("read_only", &self.read_only)
            .field("has_defaults", &self.defaults.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::{
        HttpRequestFeature, HttpRequestIdentifierFeature, HttpResponseFeature, RequestFeatures,
    };
    use crate::legacy::{MemoryRequest, MemoryResponse};
    use std::any::Any;
    use url::Url;

    fn features(defaults: Option<Arc<FeatureSet>>, read_only: bool) -> RequestFeatures {
        let request = MemoryRequest::new("GET", Url::parse("http://localhost/values").unwrap());
        RequestFeatures::from_legacy(&request, Arc::new(MemoryResponse::new()), defaults, read_only)
    }

    #[test]
    fn test_three_entries_in_order() {
        let features = features(None, false);
        let set = features.features();

        let kinds: Vec<FeatureKind> = set.iter().map(|(k, _)| k).collect();
        assert_eq!(
            kinds,
            vec![
                FeatureKind::Request,
                FeatureKind::RequestIdentifier,
                FeatureKind::Response
            ]
        );
        assert_eq!(set.len(), 3);
        assert_eq!(set.revision(), 3);
    }

    #[test]
    fn test_request_and_identifier_share_instance() {
        let features = features(None, false);
        let set = features.features();

        let request = set.get_by_kind(FeatureKind::Request).unwrap();
        let identifier = set.get_by_kind(FeatureKind::RequestIdentifier).unwrap();
        let response = set.get_by_kind(FeatureKind::Response).unwrap();
        assert!(request.same_instance(&identifier));
        assert!(!request.same_instance(&response));

        let typed: Arc<dyn HttpRequestIdentifierFeature> = set.get().unwrap();
        assert_eq!(typed.trace_identifier(), features.request().trace_identifier());
    }

    #[test]
    fn test_overwrite_keeps_position_and_bumps_revision() {
        let features = features(None, false);
        let set = features.features();
        let replacement = RequestFeatures::from_legacy(
            &MemoryRequest::new("POST", Url::parse("http://localhost/other").unwrap()),
            Arc::new(MemoryResponse::new()),
            None,
            false,
        );

        let request: Arc<dyn HttpRequestFeature> = replacement.request().clone();
        set.set(request).unwrap();

        assert_eq!(set.revision(), 4);
        let (first_kind, first) = set.iter().next().unwrap();
        assert_eq!(first_kind, FeatureKind::Request);
        let typed: Arc<dyn HttpRequestFeature> = set.get().unwrap();
        assert_eq!(typed.method(), "POST");
        assert!(matches!(first, Feature::Request(_)));
    }

    #[test]
    fn test_remove_entry() {
        let features = features(None, false);
        let set = features.features();

        set.insert(FeatureKind::Response, None).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.revision(), 4);
        assert!(set.get::<Arc<dyn HttpResponseFeature>>().is_none());

        set.insert(FeatureKind::Upgrade, None).unwrap();
        assert_eq!(set.revision(), 4);
    }

    #[test]
    fn test_custom_kind() {
        let set = FeatureSet::new();
        let value: Arc<dyn Any + Send + Sync> = Arc::new(42u32);
        set.insert(FeatureKind::Custom("answer"), Some(Feature::Other(value)))
            .unwrap();

        match set.get_by_kind(FeatureKind::Custom("answer")) {
            Some(Feature::Other(any)) => assert_eq!(any.downcast_ref::<u32>(), Some(&42)),
            other => panic!("unexpected entry: {:?}", other),
        }
        assert!(set.get_by_kind(FeatureKind::Upgrade).is_none());
    }

    #[test]
    fn test_mismatched_kind_rejected() {
        let features = features(None, false);
        let set = features.features();
        let response = set.get_by_kind(FeatureKind::Response).unwrap();

        let err = set.insert(FeatureKind::Request, Some(response)).unwrap_err();
        assert!(matches!(
            err,
            BridgeError::FeatureMismatch {
                kind: FeatureKind::Request
            }
        ));
        assert_eq!(set.revision(), 3);
    }

    #[test]
    fn test_read_only_rejects_writes() {
        let features = features(None, true);
        let set = features.features();
        assert!(set.is_read_only());

        let err = set.insert(FeatureKind::Response, None).unwrap_err();
        assert!(matches!(err, BridgeError::ReadOnlyFeatures));
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn test_defaults_fallback() {
        let defaults = Arc::new(FeatureSet::new());
        let marker: Arc<dyn Any + Send + Sync> = Arc::new("server");
        defaults
            .insert(FeatureKind::Custom("server"), Some(Feature::Other(marker)))
            .unwrap();

        let features = features(Some(defaults.clone()), false);
        let set = features.features();

        assert!(set.get_by_kind(FeatureKind::Custom("server")).is_some());
        assert_eq!(set.len(), 3);
        assert!(set.defaults().is_some());

        let standalone = FeatureSet::with_defaults(defaults);
        assert!(standalone.is_empty());
        assert!(standalone.get_by_kind(FeatureKind::Custom("server")).is_some());
    }
}
