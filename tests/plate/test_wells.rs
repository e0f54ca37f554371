use meltplate::plate::*;

#[test]
fn every_coordinate_round_trips() {
    for row in 1..=N_ROWS as i64 {
        for col in 1..=N_COLS as i64 {
            let well = WellId::encode(row, col).unwrap();
            let text = well.to_string();
            assert_eq!(WellId::parse(&text), Some(well));
            assert_eq!(normalize(&text), text);
            assert_eq!((well.row() as i64, well.col() as i64), (row, col));
        }
    }
}

#[test]
fn universe_is_row_major_and_complete() {
    let wells: Vec<String> = all_wells().map(|w| w.to_string()).collect();
    assert_eq!(wells.len(), 384);
    assert_eq!(wells[0], "A1");
    assert_eq!(wells[23], "A24");
    assert_eq!(wells[24], "B1");
    assert_eq!(wells[383], "P24");
}

#[test]
fn out_of_range_coordinates_fail() {
    assert_eq!(
        WellId::encode(17, 1),
        Err(PlateError::OutOfRange { row: 17, col: 1 })
    );
    assert!(WellId::encode(1, 25).is_err());
    assert!(WellId::encode(0, 0).is_err());
    assert_eq!(normalize("Q1"), "Q1");
    assert_eq!(normalize("p024"), "P24");
}
