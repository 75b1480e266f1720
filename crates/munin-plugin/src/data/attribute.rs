//! The closed sets of graph and field attributes understood by Munin, and the
//! ordered option maps built from them.
use std::{collections::BTreeMap, fmt, str::FromStr};

use crate::data::Error;

/// A recognised attribute name in the Munin configuration protocol.
///
/// Implementors are small closed enums whose `Ord` implementation matches the order
/// in which Munin expects the attributes to be emitted.
pub trait Attribute:
    Copy + Ord + fmt::Debug + fmt::Display + FromStr<Err = Error> + 'static
{
    /// The name of this attribute set, used in error messages and logs.
    const KIND: &'static str;

    /// Every attribute in this set, in rendering order.
    const ALL: &'static [Self];

    /// The name of the attribute as written on the wire.
    fn as_str(&self) -> &'static str;
}

/// An ordered mapping from attribute to its rendered value.
///
/// Values are stored as strings: anything implementing [`Display`][fmt::Display]
/// can be supplied and is written verbatim when the configuration is printed.
/// Iteration always follows the attribute set's fixed order, regardless of the
/// order in which attributes were set.
#[derive(Clone, PartialEq, Eq)]
pub struct Options<A: Attribute> {
    values: BTreeMap<A, String>,
}

impl<A: Attribute> Options<A> {
    /// Create an empty set of options.
    #[must_use]
    pub fn new() -> Self {
        Self {
            values: BTreeMap::new(),
        }
    }

    /// Return a new set of options with `attribute` set to `value`.
    #[must_use]
    pub fn with(mut self, attribute: A, value: impl fmt::Display) -> Self {
        self.set(attribute, value);
        self
    }

    /// Set `attribute` to `value`, returning the previous value if there was one.
    pub fn set(&mut self, attribute: A, value: impl fmt::Display) -> Option<String> {
        self.values.insert(attribute, value.to_string())
    }

    /// Set an attribute by its wire name.
    ///
    /// Names outside the recognised set are ignored rather than rejected, matching
    /// how Munin itself treats them. Returns `true` if the name was recognised.
    pub fn set_named(&mut self, name: &str, value: impl fmt::Display) -> bool {
        match name.parse::<A>() {
            Ok(attribute) => {
                self.set(attribute, value);
                true
            }
            Err(_) => {
                tracing::debug!(kind = A::KIND, name, "ignoring unrecognised attribute");
                false
            }
        }
    }

    /// Get the value of `attribute`, if set.
    pub fn get(&self, attribute: A) -> Option<&str> {
        self.values.get(&attribute).map(String::as_str)
    }

    /// Get the value of an attribute by its wire name.
    ///
    /// Unknown names simply return `None`.
    pub fn get_named(&self, name: &str) -> Option<&str> {
        name.parse::<A>().ok().and_then(|attribute| self.get(attribute))
    }

    /// Returns `true` if `attribute` has a value.
    pub fn contains(&self, attribute: A) -> bool {
        self.values.contains_key(&attribute)
    }

    /// Remove `attribute`, returning its value if it was set.
    pub fn remove(&mut self, attribute: A) -> Option<String> {
        self.values.remove(&attribute)
    }

    /// Merge `other` into these options. Values in `other` win on collision.
    pub fn merge(&mut self, other: &Self) {
        self.values
            .extend(other.values.iter().map(|(k, v)| (*k, v.clone())));
    }

    /// Return these options layered over `base`: values in `self` win on collision.
    #[must_use]
    pub fn merged_over(self, base: &Self) -> Self {
        let mut merged = base.clone();
        merged.values.extend(self.values);
        merged
    }

    /// Iterate over the populated attributes in rendering order.
    pub fn iter(&self) -> impl Iterator<Item = (A, &str)> + '_ {
        self.values.iter().map(|(k, v)| (*k, v.as_str()))
    }

    /// The number of populated attributes.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if no attribute is populated.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<A: Attribute> Default for Options<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Attribute> fmt::Debug for Options<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.values.iter().map(|(k, v)| (k.as_str(), v)))
            .finish()
    }
}

impl<A, V> FromIterator<(A, V)> for Options<A>
where
    A: Attribute,
    V: fmt::Display,
{
    fn from_iter<T: IntoIterator<Item = (A, V)>>(iter: T) -> Self {
        let mut options = Self::new();
        options.extend(iter);
        options
    }
}

impl<A, V> Extend<(A, V)> for Options<A>
where
    A: Attribute,
    V: fmt::Display,
{
    fn extend<T: IntoIterator<Item = (A, V)>>(&mut self, iter: T) {
        for (attribute, value) in iter {
            self.set(attribute, value);
        }
    }
}

/// Define an attribute enum along with its parsing, display and builder methods.
macro_rules! attributes {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident ($kind:literal) {
            $($variant:ident => $wire:literal as $method:ident),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[non_exhaustive]
        $vis enum $name {
            $(
                #[doc = concat!("The `", $wire, "` attribute.")]
                $variant,
            )+
        }

        impl Attribute for $name {
            const KIND: &'static str = $kind;
            const ALL: &'static [Self] = &[$(Self::$variant),+];

            fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $wire,)+
                }
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($wire => Ok(Self::$variant),)+
                    _ => Err(Error::UnknownAttribute {
                        kind: $kind,
                        name: s.to_string(),
                    }),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Options<$name> {
            $(
                #[doc = concat!("Return a new set of options with `", $wire, "` set to `value`.")]
                #[must_use]
                pub fn $method(self, value: impl fmt::Display) -> Self {
                    self.with($name::$variant, value)
                }
            )+
        }
    };
}

attributes! {
    /// Graph-level attributes, emitted as `graph_<attribute> <value>`.
    pub enum GraphAttribute("graph") {
        Title => "title" as title,
        Args => "args" as args,
        Category => "category" as category,
        Info => "info" as info,
        Order => "order" as order,
        Vlabel => "vlabel" as vlabel,
        Total => "total" as total,
        Scale => "scale" as scale,
        Period => "period" as period,
        Vtitle => "vtitle" as vtitle,
        Width => "width" as width,
        Height => "height" as height,
        Printf => "printf" as printf,
    }
}

attributes! {
    /// Data source attributes, emitted as `<field>.<attribute> <value>`.
    pub enum FieldAttribute("field") {
        Label => "label" as label,
        Cdef => "cdef" as cdef,
        Draw => "draw" as draw,
        Graph => "graph" as graph,
        Extinfo => "extinfo" as extinfo,
        Max => "max" as max,
        Min => "min" as min,
        Negative => "negative" as negative,
        Type => "type" as kind,
        Warning => "warning" as warning,
        Critical => "critical" as critical,
        Colour => "colour" as colour,
        Skipdraw => "skipdraw" as skipdraw,
        Sum => "sum" as sum,
        Stack => "stack" as stack,
        Line => "line" as line,
    }
}

/// Options applying to a whole graph.
pub type GraphOptions = Options<GraphAttribute>;

/// Options applying to a single data source.
pub type FieldOptions = Options<FieldAttribute>;

#[cfg(test)]
mod tests {
    use paste::paste;
    use pretty_assertions::assert_eq;

    use super::*;

    macro_rules! test_round_trip_names {
        ($t:ident) => {
            paste! {
                #[test]
                fn [< $t:snake _names_parse_back >]() {
                    for attribute in $t::ALL {
                        assert_eq!(attribute.as_str().parse::<$t>(), Ok(*attribute));
                        assert_eq!(attribute.to_string(), attribute.as_str());
                    }
                }

                #[test]
                fn [< $t:snake _order_matches_all >]() {
                    let mut sorted = $t::ALL.to_vec();
                    sorted.sort();
                    assert_eq!(sorted, $t::ALL);
                }
            }
        };
    }

    test_round_trip_names!(GraphAttribute);
    test_round_trip_names!(FieldAttribute);

    #[test]
    fn wire_order_is_fixed() {
        let graph: Vec<_> = GraphAttribute::ALL.iter().map(|a| a.as_str()).collect();
        assert_eq!(
            graph,
            [
                "title", "args", "category", "info", "order", "vlabel", "total", "scale",
                "period", "vtitle", "width", "height", "printf"
            ]
        );
        let field: Vec<_> = FieldAttribute::ALL.iter().map(|a| a.as_str()).collect();
        assert_eq!(
            field,
            [
                "label", "cdef", "draw", "graph", "extinfo", "max", "min", "negative", "type",
                "warning", "critical", "colour", "skipdraw", "sum", "stack", "line"
            ]
        );
    }

    #[test]
    fn unknown_name_fails_to_parse() {
        assert_eq!(
            "colour_scheme".parse::<FieldAttribute>(),
            Err(Error::UnknownAttribute {
                kind: "field",
                name: "colour_scheme".to_string()
            })
        );
    }

    #[test]
    fn iteration_follows_attribute_order() {
        let options = FieldOptions::new().max(100).label("Load").min(0);
        let keys: Vec<_> = options.iter().map(|(k, _)| k).collect();
        assert_eq!(
            keys,
            [FieldAttribute::Label, FieldAttribute::Max, FieldAttribute::Min]
        );
    }

    #[test]
    fn set_named_ignores_unknown_names() {
        let mut options = GraphOptions::new();
        assert!(options.set_named("vlabel", "bytes"));
        assert!(!options.set_named("colour", "red"));
        assert_eq!(options.len(), 1);
        assert_eq!(options.get_named("vlabel"), Some("bytes"));
        assert_eq!(options.get_named("colour"), None);
    }

    #[test]
    fn merge_prefers_other() {
        let mut base = FieldOptions::new().min(0).draw("LINE1");
        base.merge(&FieldOptions::new().min(5));
        assert_eq!(base.get(FieldAttribute::Min), Some("5"));
        assert_eq!(base.get(FieldAttribute::Draw), Some("LINE1"));
    }

    #[test]
    fn merged_over_prefers_self() {
        let base = FieldOptions::new().min(0).draw("LINE1");
        let merged = FieldOptions::new().min(5).merged_over(&base);
        assert_eq!(merged, FieldOptions::new().min(5).draw("LINE1"));
    }

    #[test]
    fn collect_from_pairs() {
        let options: GraphOptions = [
            (GraphAttribute::Vlabel, "requests"),
            (GraphAttribute::Category, "web"),
        ]
        .into_iter()
        .collect();
        assert_eq!(options, GraphOptions::new().category("web").vlabel("requests"));
    }
}
