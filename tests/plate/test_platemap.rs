use meltplate::io::grid_from_reader;
use meltplate::plate::*;

/// 16 x 24 annotation sheet with a header row of column numbers
fn sheet<F>(row_label: fn(usize) -> String, cell: F) -> Grid
where
    F: Fn(WellId) -> String,
{
    let mut lines = vec![std::iter::once("".to_string())
        .chain((1..=N_COLS).map(|c| c.to_string()))
        .collect::<Vec<_>>()
        .join(",")];
    for row in 1..=N_ROWS {
        let mut line = vec![row_label(row)];
        line.extend((1..=N_COLS).map(|col| cell(WellId::encode(row as i64, col as i64).unwrap())));
        lines.push(line.join(","));
    }
    grid_from_reader(lines.join("\n").as_bytes(), b',').unwrap()
}

fn letter(row: usize) -> String {
    ((b'A' + row as u8 - 1) as char).to_string()
}

fn number(row: usize) -> String {
    row.to_string()
}

#[test]
fn resolves_conditions_and_concentrations() {
    let conditions = sheet(letter, |w| match w.col() {
        1..=3 => "CompoundX".to_string(),
        4 => "DMSO".to_string(),
        _ => String::new(),
    });
    let concentrations = sheet(number, |w| match w.col() {
        1..=3 => format!("{}", 10f64.powi(w.col() as i32 - 1)),
        4 => "0".to_string(),
        _ => "-1".to_string(),
    });

    let platemap = PlateMap::resolve(&conditions, Some(&concentrations));
    assert_eq!(platemap.len(), N_WELLS);
    assert_eq!(platemap.conditions(), vec!["CompoundX", "DMSO"]);

    let groups = platemap.condition_groups();
    assert_eq!(groups["CompoundX"].len(), 48);
    assert_eq!(groups["DMSO"].len(), 16);

    let c3 = WellId::parse("C3").unwrap();
    assert_eq!(platemap.condition(c3), Some("CompoundX"));
    assert_eq!(platemap.concentration(c3), Some(100.0));

    // negative concentrations are treated as missing
    let p24 = WellId::parse("P24").unwrap();
    assert_eq!(platemap.get(p24), &WellAnnotation::default());
}

#[test]
fn conditions_without_concentrations() {
    let conditions = sheet(number, |_| "Vehicle".to_string());
    let platemap = PlateMap::resolve(&conditions, None);
    assert_eq!(platemap.condition_groups()["Vehicle"].len(), N_WELLS);
    assert!(platemap.iter().all(|(_, a)| a.concentration.is_none()));
}

#[test]
fn long_table_covers_all_wells() {
    let conditions = sheet(letter, |w| if w.row() == 1 { "X".into() } else { String::new() });
    let platemap = PlateMap::resolve(&conditions, None);
    let block = DataBlock::from_columns(3, all_wells().map(|w| (w, vec![Some(w.index() as f64); 3])));
    let matrix = PlateMatrix::from_block(block, TemperatureRange::default()).unwrap();

    let long = matrix.to_long(&platemap);
    assert_eq!(long.len(), 3 * N_WELLS);
    assert_eq!(long[0].well.to_string(), "A1");
    assert_eq!(long[0].temperature, 37.0);
    assert_eq!(long[2].temperature, 90.0);
    assert_eq!(long[0].condition.as_deref(), Some("X"));
    assert_eq!(long[3 * 24].condition, None);
    assert_eq!(long[3 * N_WELLS - 1].value, Some(383.0));
}
