//! Property-based tests for `Port` and the port probes.

use super::{MockPortProbe, Port, PortProbe, SystemPortProbe};
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 2000,
        .. ProptestConfig::default()
    })]

    #[test]
    fn port_accepts_assignable_range(port in Port::MIN..=Port::MAX) {
        let p = Port::try_from(port);
        prop_assert!(p.is_ok());
        prop_assert_eq!(p.unwrap().value(), port);
    }

    #[test]
    fn port_rejects_above_ceiling(port in (Port::MAX + 1)..=u16::MAX) {
        prop_assert!(Port::try_from(port).is_err());
    }

    // The system probe must refuse these without binding anything.
    #[test]
    fn system_probe_rejects_above_ceiling(port in (Port::MAX + 1)..=u16::MAX) {
        prop_assert!(!SystemPortProbe.is_available(port));
    }

    #[test]
    fn port_display_parses_back(port in Port::MIN..=Port::MAX) {
        let p = Port::try_from(port).unwrap();
        prop_assert_eq!(p.to_string().parse::<Port>().unwrap(), p);
    }

    #[test]
    fn first_available_never_returns_taken(
        start in Port::MIN..=Port::MAX - 10,
        taken in proptest::collection::hash_set(Port::MIN..=Port::MAX, 0..20),
    ) {
        let probe = MockPortProbe::new(taken.clone());
        let found = probe.first_available(Port::try_from(start).unwrap());
        if let Some(port) = found {
            prop_assert!(!taken.contains(&port.value()));
            prop_assert!(port.value() >= start);
        }
    }
}
