//! Capability registry: construct kinds a backend may be unable to express.
//!
//! Each backend declares its unsupported set once; the traversal consults it
//! through [`crate::CodegenContext::require`] and stops with
//! [`crate::CodegenError::Unsupported`] at the first construct in the set.

use std::fmt;

use bitflags::bitflags;

/// A construct kind that some target cannot express.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Feature {
    Iterators,
    StaticMutableFields,
    TupleInitialization,
    LabeledContinue,
    ForLoops,
    NonFiniteBounds,
    Codatatypes,
    SequenceUpdate,
    Multisets,
    SubsetTypeTests,
    NonSequentializableForall,
    MethodSynthesis,
}

impl Feature {
    pub const ALL: &[Feature] = &[
        Feature::Iterators,
        Feature::StaticMutableFields,
        Feature::TupleInitialization,
        Feature::LabeledContinue,
        Feature::ForLoops,
        Feature::NonFiniteBounds,
        Feature::Codatatypes,
        Feature::SequenceUpdate,
        Feature::Multisets,
        Feature::SubsetTypeTests,
        Feature::NonSequentializableForall,
        Feature::MethodSynthesis,
    ];

    /// Human-readable name used in diagnostics.
    pub fn description(self) -> &'static str {
        match self {
            Feature::Iterators => "iterator declarations",
            Feature::StaticMutableFields => "static mutable fields",
            Feature::TupleInitialization => "default values of tuple types",
            Feature::LabeledContinue => "continue statements with a label",
            Feature::ForLoops => "for loops over an explicit index",
            Feature::NonFiniteBounds => "quantification over a non-finite range",
            Feature::Codatatypes => "co-inductive datatypes",
            Feature::SequenceUpdate => "sequence update expressions",
            Feature::Multisets => "multisets",
            Feature::SubsetTypeTests => "type tests against subset types",
            Feature::NonSequentializableForall => "forall statements that cannot be sequentialized",
            Feature::MethodSynthesis => "synthesized method bodies",
        }
    }

    fn flag(self) -> FeatureSet {
        match self {
            Feature::Iterators => FeatureSet::ITERATORS,
            Feature::StaticMutableFields => FeatureSet::STATIC_MUTABLE_FIELDS,
            Feature::TupleInitialization => FeatureSet::TUPLE_INITIALIZATION,
            Feature::LabeledContinue => FeatureSet::LABELED_CONTINUE,
            Feature::ForLoops => FeatureSet::FOR_LOOPS,
            Feature::NonFiniteBounds => FeatureSet::NON_FINITE_BOUNDS,
            Feature::Codatatypes => FeatureSet::CODATATYPES,
            Feature::SequenceUpdate => FeatureSet::SEQUENCE_UPDATE,
            Feature::Multisets => FeatureSet::MULTISETS,
            Feature::SubsetTypeTests => FeatureSet::SUBSET_TYPE_TESTS,
            Feature::NonSequentializableForall => FeatureSet::NON_SEQUENTIALIZABLE_FORALL,
            Feature::MethodSynthesis => FeatureSet::METHOD_SYNTHESIS,
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

bitflags! {
    /// A set of [`Feature`]s, fixed for the duration of a run.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct FeatureSet: u32 {
        const ITERATORS = 1 << 0;
        const STATIC_MUTABLE_FIELDS = 1 << 1;
        const TUPLE_INITIALIZATION = 1 << 2;
        const LABELED_CONTINUE = 1 << 3;
        const FOR_LOOPS = 1 << 4;
        const NON_FINITE_BOUNDS = 1 << 5;
        const CODATATYPES = 1 << 6;
        const SEQUENCE_UPDATE = 1 << 7;
        const MULTISETS = 1 << 8;
        const SUBSET_TYPE_TESTS = 1 << 9;
        const NON_SEQUENTIALIZABLE_FORALL = 1 << 10;
        const METHOD_SYNTHESIS = 1 << 11;
    }
}

impl FeatureSet {
    pub fn has(self, feature: Feature) -> bool {
        self.contains(feature.flag())
    }

    /// The features in this set, in declaration order.
    pub fn features(self) -> impl Iterator<Item = Feature> {
        Feature::ALL.iter().copied().filter(move |f| self.has(*f))
    }
}

impl FromIterator<Feature> for FeatureSet {
    fn from_iter<I: IntoIterator<Item = Feature>>(iter: I) -> Self {
        iter.into_iter()
            .fold(FeatureSet::empty(), |set, f| set | f.flag())
    }
}
