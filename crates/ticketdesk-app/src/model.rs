// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};
use url::Url;

use crate::ids::*;

/// Table ids the dashboard templates render, in page order.
pub const KNOWN_TABLES: [&str; 5] = [
    "unassigned-tickets",
    "open-tickets",
    "in-progress-tickets",
    "closed-tickets",
    "all-tickets",
];

pub const EXPORT_TABLE: &str = "all-tickets";
pub const EXPORT_BUTTON: &str = "exportTickets";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterKind {
    Search,
    Status,
    Priority,
    Department,
    Technician,
    Date,
}

impl FilterKind {
    pub const ALL: [Self; 6] = [
        Self::Search,
        Self::Status,
        Self::Priority,
        Self::Department,
        Self::Technician,
        Self::Date,
    ];

    /// Marker class carried by the control element.
    pub const fn class_name(self) -> &'static str {
        match self {
            Self::Search => "ticket-search",
            Self::Status => "status-filter",
            Self::Priority => "priority-filter",
            Self::Department => "department-filter",
            Self::Technician => "technician-filter",
            Self::Date => "date-filter",
        }
    }

    pub const fn query_param(self) -> &'static str {
        match self {
            Self::Search => "search",
            Self::Status => "status",
            Self::Priority => "priority",
            Self::Department => "department",
            Self::Technician => "technician",
            Self::Date => "date",
        }
    }

    pub fn parse_class(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.class_name() == value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    #[default]
    Shown,
    Hidden,
}

impl Visibility {
    pub const fn from_match(matched: bool) -> Self {
        if matched { Self::Shown } else { Self::Hidden }
    }

    pub const fn is_shown(self) -> bool {
        matches!(self, Self::Shown)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Locale {
    #[default]
    Es,
    En,
}

impl Locale {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Es => "es",
            Self::En => "en",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "es" => Some(Self::Es),
            "en" => Some(Self::En),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldId {
    Description,
    Category,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    pub cells: Vec<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub technician: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub visibility: Visibility,
}

impl Row {
    pub fn new<I, S>(cells: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            cells: cells.into_iter().map(Into::into).collect(),
            status: None,
            priority: None,
            department: None,
            technician: None,
            date: None,
            visibility: Visibility::Shown,
        }
    }

    /// Concatenated cell text, the row's searchable content.
    pub fn text(&self) -> String {
        self.cells.join(" ")
    }

    pub fn is_visible(&self) -> bool {
        self.visibility.is_shown()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub id: TableId,
    #[serde(default)]
    pub headers: Vec<String>,
    #[serde(default)]
    pub rows: Vec<Row>,
}

impl Table {
    pub fn visible_rows(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter().filter(|row| row.is_visible())
    }

    pub fn visible_count(&self) -> usize {
        self.visible_rows().count()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterControl {
    pub id: ControlId,
    pub kind: FilterKind,
    pub table: TableId,
    #[serde(default)]
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counter {
    pub table: TableId,
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub id: SectionId,
    /// Tables nested anywhere inside the section, in document order.
    #[serde(default)]
    pub tables: Vec<TableId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLink {
    pub id: LinkId,
    pub href: String,
    /// Nearest enclosing section, if any.
    #[serde(default)]
    pub section: Option<SectionId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextArea {
    #[serde(default)]
    pub value: String,
    pub cols: u16,
    pub rows: u16,
    #[serde(default = "default_min_rows")]
    pub min_rows: u16,
}

fn default_min_rows() -> u16 {
    3
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketFields {
    pub description: TextArea,
    /// Selected category value; empty means nothing selected.
    #[serde(default)]
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Form {
    pub id: FormId,
    /// Present on the guarded ticket-creation form.
    #[serde(default)]
    pub ticket: Option<TicketFields>,
    #[serde(default = "default_interactive")]
    pub interactive: bool,
}

fn default_interactive() -> bool {
    true
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonKind {
    Submit,
    /// Any element carrying the generic `btn` marker.
    Marked,
    Plain,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Button {
    pub id: ButtonId,
    pub kind: ButtonKind,
    #[serde(default)]
    pub form: Option<FormId>,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub confirm: Option<String>,
    #[serde(default)]
    pub loading: bool,
    #[serde(default)]
    pub saved_label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MyTicketRow {
    pub cells: Vec<String>,
    #[serde(default)]
    pub status_badge: Option<String>,
    #[serde(default)]
    pub visibility: Visibility,
}

/// The signed-in user's own ticket list with its two simple filters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MyTickets {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub rows: Vec<MyTicketRow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub location: Url,
    #[serde(default)]
    pub tables: Vec<Table>,
    #[serde(default)]
    pub controls: Vec<FilterControl>,
    #[serde(default)]
    pub counters: Vec<Counter>,
    #[serde(default)]
    pub sections: Vec<Section>,
    #[serde(default)]
    pub links: Vec<PageLink>,
    #[serde(default)]
    pub forms: Vec<Form>,
    #[serde(default)]
    pub buttons: Vec<Button>,
    #[serde(default)]
    pub my_tickets: Option<MyTickets>,
    #[serde(default)]
    pub focus: Option<FieldId>,
}

impl Page {
    pub fn new(location: Url) -> Self {
        Self {
            location,
            tables: Vec::new(),
            controls: Vec::new(),
            counters: Vec::new(),
            sections: Vec::new(),
            links: Vec::new(),
            forms: Vec::new(),
            buttons: Vec::new(),
            my_tickets: None,
            focus: None,
        }
    }

    pub fn table(&self, id: &TableId) -> Option<&Table> {
        self.tables.iter().find(|table| &table.id == id)
    }

    pub fn table_mut(&mut self, id: &TableId) -> Option<&mut Table> {
        self.tables.iter_mut().find(|table| &table.id == id)
    }

    /// First control of `kind` bound to `table`.
    pub fn control_for(&self, kind: FilterKind, table: &TableId) -> Option<&FilterControl> {
        self.controls
            .iter()
            .find(|control| control.kind == kind && &control.table == table)
    }

    pub fn control_mut(&mut self, id: &ControlId) -> Option<&mut FilterControl> {
        self.controls.iter_mut().find(|control| &control.id == id)
    }

    pub fn counter(&self, table: &TableId) -> Option<&Counter> {
        self.counters.iter().find(|counter| &counter.table == table)
    }

    pub fn counter_mut(&mut self, table: &TableId) -> Option<&mut Counter> {
        self.counters
            .iter_mut()
            .find(|counter| &counter.table == table)
    }

    pub fn section(&self, id: &SectionId) -> Option<&Section> {
        self.sections.iter().find(|section| &section.id == id)
    }

    pub fn link(&self, id: &LinkId) -> Option<&PageLink> {
        self.links.iter().find(|link| &link.id == id)
    }

    pub fn button(&self, id: &ButtonId) -> Option<&Button> {
        self.buttons.iter().find(|button| &button.id == id)
    }

    pub fn button_mut(&mut self, id: &ButtonId) -> Option<&mut Button> {
        self.buttons.iter_mut().find(|button| &button.id == id)
    }

    pub fn form(&self, id: &FormId) -> Option<&Form> {
        self.forms.iter().find(|form| &form.id == id)
    }

    pub fn form_mut(&mut self, id: &FormId) -> Option<&mut Form> {
        self.forms.iter_mut().find(|form| &form.id == id)
    }

    /// The first form carrying ticket fields.
    pub fn ticket_form(&self) -> Option<(&FormId, &TicketFields)> {
        self.forms
            .iter()
            .find_map(|form| form.ticket.as_ref().map(|ticket| (&form.id, ticket)))
    }

    pub fn ticket_fields_mut(&mut self) -> Option<&mut TicketFields> {
        self.forms.iter_mut().find_map(|form| form.ticket.as_mut())
    }
}
