use std::fs;

use omnibus::{
    catalogue::Catalogue,
    router::{Router, RoutingSettings},
    shared::geo::Coordinate,
    snapshot::{self, Restored},
};

fn coordinate(latitude: f64, longitude: f64) -> Coordinate {
    Coordinate {
        latitude,
        longitude,
    }
}

fn example_catalogue() -> Catalogue {
    let mut catalogue = Catalogue::new();
    catalogue.add_stop("Tolstopaltsevo", coordinate(55.611087, 37.20829));
    catalogue.add_stop("Marushkino", coordinate(55.595884, 37.209755));
    catalogue.add_stop("Rasskazovka", coordinate(55.632761, 37.333324));
    catalogue.set_distance("Tolstopaltsevo", "Marushkino", 3900);
    catalogue.set_distance("Marushkino", "Rasskazovka", 9900);
    catalogue.set_distance("Rasskazovka", "Marushkino", 9500);
    catalogue.add_bus("256", true, ["Tolstopaltsevo", "Marushkino"]);
    catalogue.add_bus("750", false, ["Tolstopaltsevo", "Marushkino", "Rasskazovka"]);
    catalogue
}

#[test]
fn snapshot_roundtrip_test() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("transit.db");

    let catalogue = example_catalogue();
    let router = Router::new(&catalogue, RoutingSettings::from_kmh(6, 40.0));
    let expected = router.build_route("Tolstopaltsevo", "Rasskazovka").unwrap();
    snapshot::save(&path, &catalogue, &router).unwrap();

    let Restored {
        catalogue: restored,
        parts,
    } = snapshot::load(&path).unwrap();

    // Every stop and bus comes back with identical data and ids.
    assert_eq!(restored.stops().len(), catalogue.stops().len());
    for (before, after) in catalogue.stops().iter().zip(restored.stops()) {
        assert_eq!(before.name, after.name);
        assert_eq!(before.index, after.index);
        assert_eq!(before.coordinate, after.coordinate);
    }
    assert_eq!(restored.buses().len(), catalogue.buses().len());
    for (before, after) in catalogue.buses().iter().zip(restored.buses()) {
        assert_eq!(before.name, after.name);
        assert_eq!(before.is_roundtrip, after.is_roundtrip);
        assert_eq!(before.stops, after.stops);
    }
    let t = restored.stop("Tolstopaltsevo").unwrap().index;
    let m = restored.stop("Marushkino").unwrap().index;
    assert_eq!(restored.distance_between(t, m).as_meters(), 3900.0);

    // The restored router answers exactly like the one it was captured
    // from, without rebuilding the graph.
    let router = Router::from_parts(&restored, parts);
    assert_eq!(router.settings().wait_time, 6);
    let reloaded = router.build_route("Tolstopaltsevo", "Rasskazovka").unwrap();
    assert_eq!(reloaded.legs.len(), expected.legs.len());
    assert!(
        (reloaded.total_time.as_minutes() - expected.total_time.as_minutes()).abs() < 1e-9
    );
}

#[test]
fn snapshot_restores_warm_tables_test() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("transit.db");

    let catalogue = example_catalogue();
    let router = Router::new(&catalogue, RoutingSettings::from_kmh(6, 40.0));
    // Warm the solver for one source before capturing.
    let expected = router.build_route("Marushkino", "Rasskazovka").unwrap();
    snapshot::save(&path, &catalogue, &router).unwrap();

    let Restored {
        catalogue: restored,
        parts,
    } = snapshot::load(&path).unwrap();
    let router = Router::from_parts(&restored, parts);

    let reloaded = router.build_route("Marushkino", "Rasskazovka").unwrap();
    assert!(
        (reloaded.total_time.as_minutes() - expected.total_time.as_minutes()).abs() < 1e-9
    );
}

#[test]
fn save_load_save_identical_test() {
    let dir = tempfile::tempdir().unwrap();
    let first_path = dir.path().join("first.db");
    let second_path = dir.path().join("second.db");

    let catalogue = example_catalogue();
    let router = Router::new(&catalogue, RoutingSettings::from_kmh(6, 40.0));
    router.build_route("Tolstopaltsevo", "Rasskazovka").unwrap();
    snapshot::save(&first_path, &catalogue, &router).unwrap();

    let Restored {
        catalogue: restored,
        parts,
    } = snapshot::load(&first_path).unwrap();
    let router = Router::from_parts(&restored, parts);
    snapshot::save(&second_path, &restored, &router).unwrap();

    assert_eq!(
        fs::read(&first_path).unwrap(),
        fs::read(&second_path).unwrap()
    );
}

#[test]
fn missing_snapshot_test() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.db");
    assert!(snapshot::load(&path).is_err());
}

#[test]
fn malformed_snapshot_test() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("garbage.db");
    fs::write(&path, b"not a snapshot at all").unwrap();
    assert!(snapshot::load(&path).is_err());
}
