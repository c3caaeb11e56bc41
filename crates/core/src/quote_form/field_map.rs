use std::collections::HashMap;
use std::sync::OnceLock;

/// Quote form field → backend column, in declaration order.
///
/// `pcbNote` and `specialRequests` both land in `pcbnote`; when a form
/// carries both, whichever key comes later in the form wins.
pub const QUOTE_FIELD_MAP: &[(&str, &str)] = &[
    // Board
    ("pcbType", "pcbtype"),
    ("layerCount", "layers"),
    ("boardThickness", "thickness"),
    ("singleLength", "singlelength"),
    ("singleWidth", "singlewidth"),
    ("singleCount", "singlecount"),
    ("shipmentType", "shipmenttype"),
    ("panelRows", "panelrows"),
    ("panelColumns", "panelcolumns"),
    ("breakAwayRail", "breakawayrail"),
    ("differentDesignCount", "differentdesign"),
    ("materialType", "materialtype"),
    ("tgRating", "tg"),
    ("minTrace", "mintrace"),
    ("minHole", "minhole"),
    ("outerCopperWeight", "outercopperweight"),
    ("innerCopperWeight", "innercopperweight"),
    // Finish
    ("solderMaskColor", "soldermask"),
    ("silkscreenColor", "silkscreen"),
    ("surfaceFinish", "surfacefinish"),
    ("impedanceControl", "impedance"),
    ("goldFingers", "goldfingers"),
    ("edgePlating", "edgeplating"),
    ("viaProcess", "viaprocess"),
    // Testing and delivery
    ("electricalTest", "testmethod"),
    ("productReport", "productreport"),
    ("deliveryTime", "deliverytime"),
    // Shipping
    ("shippingCountry", "shippingcountry"),
    ("shippingCity", "shippingcity"),
    ("shippingPostalCode", "shippingzip"),
    ("courierName", "courier"),
    ("customsDeclaration", "declarationmethod"),
    ("declaredValue", "declaredvalue"),
    // Notes
    ("pcbNote", "pcbnote"),
    ("specialRequests", "pcbnote"),
];

static QUOTE_FIELDS: OnceLock<FieldMap> = OnceLock::new();

/// The shared quote form mapping.
pub fn quote_field_map() -> &'static FieldMap {
    QUOTE_FIELDS.get_or_init(|| FieldMap::from_pairs(QUOTE_FIELD_MAP.iter().copied()))
}

/// Frontend key → backend key dictionary. Keys without an entry map to themselves.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldMap {
    entries: HashMap<String, String>,
}

impl FieldMap {
    /// Builds a map; a repeated frontend key keeps its last backend key.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// The backend name for `frontend_key`, or the key itself when unmapped.
    pub fn backend_key<'a>(&'a self, frontend_key: &'a str) -> &'a str {
        self.entries
            .get(frontend_key)
            .map(String::as_str)
            .unwrap_or(frontend_key)
    }

    pub fn contains(&self, frontend_key: &str) -> bool {
        self.entries.contains_key(frontend_key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_quote_map_has_every_entry() {
        assert_eq!(QUOTE_FIELD_MAP.len(), 35);
        assert_eq!(quote_field_map().len(), 35);
    }

    #[test]
    fn test_frontend_keys_are_unique() {
        let keys: HashSet<&str> = QUOTE_FIELD_MAP.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys.len(), QUOTE_FIELD_MAP.len());
    }

    #[test]
    fn test_backend_keys_are_lowercase() {
        for (frontend, backend) in QUOTE_FIELD_MAP {
            assert_eq!(
                *backend,
                backend.to_lowercase(),
                "{} maps to non-lowercase {}",
                frontend,
                backend
            );
        }
    }

    #[test]
    fn test_backend_key_lookup() {
        let map = quote_field_map();
        assert_eq!(map.backend_key("pcbType"), "pcbtype");
        assert_eq!(map.backend_key("shippingPostalCode"), "shippingzip");
        assert_eq!(map.backend_key("foo"), "foo");
        assert!(map.contains("layerCount"));
        assert!(!map.contains("layers"));
    }

    #[test]
    fn test_repeated_frontend_key_keeps_last() {
        let map = FieldMap::from_pairs([("a", "x"), ("a", "y")]);
        assert_eq!(map.backend_key("a"), "y");
        assert_eq!(map.len(), 1);
    }
}
