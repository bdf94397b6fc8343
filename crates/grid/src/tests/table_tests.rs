// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::{column_of, rows};
use crate::{Column, ColumnFormat, DataTable, RenderedRow, RowAction, TableView};
use serde_json::{Value, json};

fn members() -> Vec<Value> {
    rows(json!([
        {"id": 1, "name": "Anna", "city": "Roma", "monthly_fee": 60.0, "active": true},
        {"id": 2, "name": "Marco", "city": "Milano", "monthly_fee": 1234.5, "active": false},
        {"id": 3, "name": "DANIELE", "city": "Roma", "monthly_fee": null, "active": true},
        {"id": 4, "name": "Luca", "city": "Napoli", "monthly_fee": 45, "active": true}
    ]))
}

fn grid() -> DataTable {
    DataTable::new(vec![
        Column::new("name", "Nome"),
        Column::new("city", "Città"),
        Column::new("monthly_fee", "Quota mensile").with_format(ColumnFormat::Currency),
        Column::new("active", "Attivo").with_format(ColumnFormat::Boolean),
    ])
}

#[test]
fn test_filter_is_case_insensitive_substring() {
    let data: Vec<Value> = members();
    let mut table: DataTable = grid();
    table.set_filter("name", "AN");
    assert_eq!(
        column_of(&table.view(&data), "name"),
        vec!["Anna", "DANIELE"]
    );
}

#[test]
fn test_filters_combine_with_and() {
    let data: Vec<Value> = members();
    let mut table: DataTable = grid();
    table.set_filter("name", "a");
    table.set_filter("city", "roma");
    assert_eq!(
        column_of(&table.view(&data), "name"),
        vec!["Anna", "DANIELE"]
    );
    table.set_filter("city", "mil");
    assert_eq!(column_of(&table.view(&data), "name"), vec!["Marco"]);
}

#[test]
fn test_empty_filter_is_removed() {
    let data: Vec<Value> = members();
    let mut table: DataTable = grid();
    table.set_filter("name", "zzz");
    assert!(table.view(&data).is_empty());
    table.set_filter("name", "");
    assert!(table.filters().is_empty());
    assert_eq!(table.view(&data).len(), 4);
}

#[test]
fn test_filter_on_null_cell_matches_nothing_but_empty() {
    let data: Vec<Value> = members();
    let mut table: DataTable = grid();
    table.set_filter("monthly_fee", "4");
    assert_eq!(
        column_of(&table.view(&data), "name"),
        vec!["Marco", "Luca"]
    );
}

#[test]
fn test_render_empty_rows_gives_single_placeholder() {
    let table: DataTable = grid().with_empty_message("Nessun socio trovato");
    let view: TableView = table.render::<Value, _>(&[], &[], |_, _| true);
    assert_eq!(view.headers.len(), 4);
    assert_eq!(
        view.rows,
        vec![RenderedRow::Placeholder {
            message: String::from("Nessun socio trovato"),
            colspan: 4,
        }]
    );
}

#[test]
fn test_render_placeholder_when_filter_excludes_everything() {
    let data: Vec<Value> = members();
    let mut table: DataTable = grid();
    table.set_filter("city", "Torino");
    let view: TableView = table.render(&data, &[], |_, _| true);
    assert_eq!(view.rows.len(), 1);
    assert!(matches!(
        view.rows[0],
        RenderedRow::Placeholder { colspan: 4, .. }
    ));
}

#[test]
fn test_render_formats_cells_and_gates_actions() {
    let data: Vec<Value> = members();
    let mut table: DataTable = grid();
    table.set_filter("name", "mar");
    let actions: Vec<RowAction> = vec![
        RowAction::new("edit", "Modifica"),
        RowAction::new("delete", "Elimina"),
    ];
    let view: TableView = table.render(&data, &actions, |_, action| action.id == "edit");

    assert_eq!(
        view.rows,
        vec![RenderedRow::Data {
            cells: vec![
                String::from("Marco"),
                String::from("Milano"),
                String::from("€ 1.234,50"),
                String::from("No"),
            ],
            actions: vec![RowAction::new("edit", "Modifica")],
        }]
    );
}

#[test]
fn test_action_predicate_sees_the_row() {
    let data: Vec<Value> = members();
    let table: DataTable = grid();
    let actions: Vec<RowAction> = vec![RowAction::new("delete", "Elimina")];
    let view: TableView = table.render(&data, &actions, |row, _| {
        row.get("active").and_then(Value::as_bool) == Some(false)
    });
    let with_actions: usize = view
        .rows
        .iter()
        .filter(|row| matches!(row, RenderedRow::Data { actions, .. } if !actions.is_empty()))
        .count();
    assert_eq!(with_actions, 1);
}
