use omnibus::{catalogue::Catalogue, shared::geo::Coordinate};

fn coordinate(latitude: f64, longitude: f64) -> Coordinate {
    Coordinate {
        latitude,
        longitude,
    }
}

#[test]
fn add_and_find_stop_test() {
    let mut catalogue = Catalogue::new();
    catalogue.add_stop("Tolstopaltsevo", coordinate(55.611087, 37.20829));

    let stop = catalogue.stop("Tolstopaltsevo").unwrap();
    assert_eq!(stop.name.as_ref(), "Tolstopaltsevo");
    assert_eq!(stop.coordinate.latitude, 55.611087);
    assert!(catalogue.stop("Marushkino").is_none());
}

#[test]
fn unknown_bus_test() {
    let catalogue = Catalogue::new();
    assert!(catalogue.bus("256").is_none());
    assert!(catalogue.bus_stats("256").is_none());
}

#[test]
fn distance_fallback_test() {
    let mut catalogue = Catalogue::new();
    let a = catalogue.add_stop("A", coordinate(55.0, 37.0));
    let b = catalogue.add_stop("B", coordinate(55.1, 37.1));
    catalogue.set_distance("A", "B", 100);

    // Forward entry wins, reverse lookup falls back to it, and a pair
    // with no entry at all resolves to zero.
    assert_eq!(catalogue.distance_between(a, b).as_meters(), 100.0);
    assert_eq!(catalogue.distance_between(b, a).as_meters(), 100.0);

    let c = catalogue.add_stop("C", coordinate(55.2, 37.2));
    assert_eq!(catalogue.distance_between(a, c).as_meters(), 0.0);
}

#[test]
fn distance_asymmetry_test() {
    let mut catalogue = Catalogue::new();
    let a = catalogue.add_stop("A", coordinate(55.0, 37.0));
    let b = catalogue.add_stop("B", coordinate(55.1, 37.1));
    catalogue.set_distance("A", "B", 100);
    catalogue.set_distance("B", "A", 250);

    assert_eq!(catalogue.distance_between(a, b).as_meters(), 100.0);
    assert_eq!(catalogue.distance_between(b, a).as_meters(), 250.0);
}

#[test]
fn distance_overwrite_test() {
    let mut catalogue = Catalogue::new();
    let a = catalogue.add_stop("A", coordinate(55.0, 37.0));
    let b = catalogue.add_stop("B", coordinate(55.1, 37.1));
    catalogue.set_distance("A", "B", 100);
    catalogue.set_distance("A", "B", 300);

    assert_eq!(catalogue.distance_between(a, b).as_meters(), 300.0);
}

#[test]
fn duplicate_stop_name_repoints_test() {
    let mut catalogue = Catalogue::new();
    let first = catalogue.add_stop("X", coordinate(55.0, 37.0));
    let second = catalogue.add_stop("X", coordinate(56.0, 38.0));

    // Last write wins for lookups; the earlier record stays in the
    // arena, unreachable by name.
    assert_ne!(first, second);
    assert_eq!(catalogue.stop("X").unwrap().index, second);
    assert_eq!(catalogue.stop("X").unwrap().coordinate.latitude, 56.0);
    assert_eq!(catalogue.stops().len(), 2);
}

#[test]
fn buses_at_stop_test() {
    let mut catalogue = Catalogue::new();
    catalogue.add_stop("A", coordinate(55.0, 37.0));
    catalogue.add_stop("B", coordinate(55.1, 37.1));
    catalogue.add_bus("750", true, ["A", "B"]);
    catalogue.add_bus("256", true, ["A"]);

    let buses: Vec<_> = catalogue
        .buses_at("A")
        .unwrap()
        .iter()
        .map(|bus| bus.as_ref().to_owned())
        .collect();
    assert_eq!(buses, ["256", "750"]);
    assert!(catalogue.buses_at("C").is_none());
}

#[test]
fn roundtrip_stats_test() {
    let mut catalogue = Catalogue::new();
    catalogue.add_stop("Tolstopaltsevo", coordinate(55.611087, 37.20829));
    catalogue.add_stop("Marushkino", coordinate(55.595884, 37.209755));
    catalogue.set_distance("Tolstopaltsevo", "Marushkino", 3900);
    catalogue.add_bus("256", true, ["Tolstopaltsevo", "Marushkino"]);

    let stats = catalogue.bus_stats("256").unwrap();
    assert_eq!(stats.stop_count, 2);
    assert_eq!(stats.unique_stop_count, 2);
    assert_eq!(stats.road_length.as_meters(), 3900.0);
    assert!(stats.great_circle_length.as_meters() > 1600.0);
    assert!(stats.curvature > 2.2 && stats.curvature < 2.4);
}

#[test]
fn there_and_back_stats_test() {
    let mut catalogue = Catalogue::new();
    catalogue.add_stop("A", coordinate(55.0, 37.0));
    catalogue.add_stop("B", coordinate(55.01, 37.0));
    catalogue.add_stop("C", coordinate(55.02, 37.0));
    catalogue.set_distance("A", "B", 100);
    catalogue.set_distance("B", "A", 150);
    catalogue.set_distance("B", "C", 200);
    catalogue.add_bus("7", false, ["A", "B", "C"]);

    let stats = catalogue.bus_stats("7").unwrap();
    // Forward 100 + 200, backward 200 (fallback) + 150: the two
    // directions accumulate independently.
    assert_eq!(stats.road_length.as_meters(), 650.0);
    assert_eq!(stats.stop_count, 5);
    assert_eq!(stats.unique_stop_count, 3);
}

#[test]
fn degenerate_curvature_test() {
    let mut catalogue = Catalogue::new();
    catalogue.add_stop("Only", coordinate(55.0, 37.0));
    catalogue.add_bus("0", true, ["Only"]);

    let stats = catalogue.bus_stats("0").unwrap();
    assert_eq!(stats.stop_count, 1);
    assert_eq!(stats.great_circle_length.as_meters(), 0.0);
    assert!(stats.curvature.is_nan());
}
