//! Tests for the country catalog

#[cfg(test)]
mod tests {
    use super::super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_has_one_hundred_unique_keys() {
        let catalog = CountryCatalog::global();
        assert_eq!(catalog.len(), 100);

        let keys: HashSet<&str> = catalog.keys().collect();
        assert_eq!(keys.len(), 100);
    }

    #[test]
    fn test_long_name_lookup() {
        let catalog = CountryCatalog::global();
        assert_eq!(catalog.long_name("USA"), Some("United States of America"));
        assert_eq!(catalog.long_name("Czech Republic"), Some("Czechia"));
        assert_eq!(catalog.long_name("Vietnam"), Some("Viet Nam"));
        assert_eq!(catalog.long_name("Atlantis"), None);
    }

    #[test]
    fn test_keys_are_case_sensitive() {
        let catalog = CountryCatalog::global();
        assert!(catalog.contains("Japan"));
        assert!(!catalog.contains("japan"));
    }

    #[test]
    fn test_keys_in_catalog_order() {
        let keys: Vec<&str> = CountryCatalog::global().keys().take(3).collect();
        assert_eq!(keys, vec!["USA", "Canada", "Mexico"]);

        let last = CountryCatalog::global().keys().last();
        assert_eq!(last, Some("New Zealand"));
    }

    #[test]
    fn test_validate_accepts_known_keys() {
        let catalog = CountryCatalog::global();
        assert!(catalog.validate(&["USA", "Brazil", "Kenya"]).is_ok());
        assert!(catalog.validate::<&str>(&[]).is_ok());
    }

    #[test]
    fn test_validate_reports_all_unknown_keys_once() {
        let catalog = CountryCatalog::global();
        let err = catalog
            .validate(&["USA", "Atlantis", "France", "Narnia"])
            .unwrap_err();

        match err {
            PulseError::UnknownCountries(unknown) => {
                assert_eq!(unknown, vec!["Atlantis".to_string(), "Narnia".to_string()]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_global_is_shared() {
        assert!(std::ptr::eq(CountryCatalog::global(), CountryCatalog::global()));
    }
}
