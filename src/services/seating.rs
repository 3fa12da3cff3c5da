//! Seat map layout and seat selection.
//!
//! A section is a list of rows, each split into a left and a right block
//! around a central aisle. Seat numbers grow outward from the aisle on both
//! sides and the left block always holds the higher numbers: a 9 seat row
//! with 5 seats on the left reads `9 8 7 6 5 | 4 3 2 1`.
//!
//! The layout functions know nothing about shows: callers pass occupied
//! seats already filtered to the show being displayed. `SeatingService`
//! does that filtering against the repository.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

use crate::{
    config::VenueConfig,
    error::{AppError, AppResult},
    models::{
        sale::{Sale, Seat},
        Show,
    },
    repository::{Repository, Snapshot},
};

/// One row of the house as configured
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RowSpec {
    #[serde(default)]
    pub name: String,
    /// Total seats in the row
    #[serde(default, alias = "totalSeats", deserialize_with = "lenient_count")]
    pub seats: u32,
    /// Seats left of the aisle; half the row (rounded up) when absent or zero
    #[serde(default, alias = "left_seats", deserialize_with = "lenient_optional_count")]
    pub left_seats: Option<u32>,
}

impl RowSpec {
    pub fn new(name: impl Into<String>, seats: u32, left_seats: Option<u32>) -> Self {
        Self {
            name: name.into(),
            seats,
            left_seats,
        }
    }

    /// `(left, right)` block sizes
    pub fn split(&self) -> (u32, u32) {
        let left = match self.left_seats {
            Some(left) if left > 0 => left.min(self.seats),
            _ => self.seats.div_ceil(2),
        };
        (left, self.seats - left)
    }

    pub fn contains(&self, seat_number: u32) -> bool {
        (1..=self.seats).contains(&seat_number)
    }
}

/// Counts coming from hand-edited config or client JSON may be negative,
/// fractional, textual or missing. All of those collapse to a sane u32.
#[derive(Deserialize)]
#[serde(untagged)]
enum Count {
    Int(i64),
    Float(f64),
    Text(String),
    Other(serde::de::IgnoredAny),
}

impl Count {
    fn value(self) -> u32 {
        match self {
            Count::Int(n) => n.clamp(0, i64::from(u32::MAX)) as u32,
            Count::Float(f) if f.is_finite() && f > 0.0 => f.min(f64::from(u32::MAX)) as u32,
            Count::Float(_) => 0,
            Count::Text(s) => s
                .trim()
                .parse::<i64>()
                .map(|n| Count::Int(n).value())
                .unwrap_or(0),
            Count::Other(_) => 0,
        }
    }
}

fn lenient_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    Ok(Count::deserialize(deserializer)?.value())
}

fn lenient_optional_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
    Ok(Option::<Count>::deserialize(deserializer)?.map(Count::value))
}

/// Set of seats keyed by `(row, seat_number)`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeatSet(HashSet<(String, u32)>);

impl SeatSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, row: &str, seat_number: u32) -> bool {
        self.0.contains(&(row.to_string(), seat_number))
    }

    pub fn insert(&mut self, seat: &Seat) -> bool {
        self.0.insert(seat.key())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> FromIterator<&'a Seat> for SeatSet {
    fn from_iter<I: IntoIterator<Item = &'a Seat>>(iter: I) -> Self {
        Self(iter.into_iter().map(Seat::key).collect())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SeatStatus {
    Available,
    Selected,
    Disabled,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SeatCell {
    pub number: u32,
    pub status: SeatStatus,
    /// Holder of an occupied seat, shown as a tooltip
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RowLayout {
    pub name: String,
    pub total_seats: u32,
    pub left_seats: u32,
    pub right_seats: u32,
    /// Highest number first, ending next to the aisle
    pub left_block: Vec<SeatCell>,
    /// Starts next to the aisle with `right_seats`, ending at 1
    pub right_block: Vec<SeatCell>,
    /// Padding on the outer edge of the left block
    pub left_pad: u32,
    /// Padding on the outer edge of the right block
    pub right_pad: u32,
}

impl RowLayout {
    fn cells_mut(&mut self) -> impl Iterator<Item = &mut SeatCell> {
        self.left_block.iter_mut().chain(self.right_block.iter_mut())
    }
}

#[derive(Debug, Clone)]
pub struct SeatMapOptions {
    pub section: String,
    pub align_aisle: bool,
    pub max_selection: usize,
    /// Seat width plus inter-seat gap
    pub unit_width: u32,
}

impl Default for SeatMapOptions {
    fn default() -> Self {
        Self {
            section: "South".to_string(),
            align_aisle: false,
            max_selection: 10,
            unit_width: 37,
        }
    }
}

/// Renderable seating chart
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SeatMap {
    pub section: String,
    pub align_aisle: bool,
    pub unit_width: u32,
    pub max_left_seats: u32,
    pub max_right_seats: u32,
    pub rows: Vec<RowLayout>,
    pub total_seats: u32,
    pub sold: usize,
    pub available: i64,
    pub selected: usize,
    pub max_selection: usize,
}

impl SeatMap {
    /// Distance from the row's outer left edge to its aisle gap
    pub fn aisle_offset(&self, row: &RowLayout) -> u32 {
        row.left_pad + row.left_seats * self.unit_width
    }

    /// Attach holder names to occupied seats; other cells carry none
    pub fn annotate(&mut self, customers: &HashMap<(String, u32), String>) {
        for row in &mut self.rows {
            let name = row.name.clone();
            for cell in row.cells_mut() {
                cell.customer_name = match cell.status {
                    SeatStatus::Disabled => customers.get(&(name.clone(), cell.number)).cloned(),
                    _ => None,
                };
            }
        }
    }
}

/// Lay out `rows` and classify every seat against the occupied and selected sets
pub fn build_seat_map(
    rows: &[RowSpec],
    options: &SeatMapOptions,
    occupied: &SeatSet,
    selected: &SeatSet,
) -> SeatMap {
    let splits: Vec<(u32, u32)> = rows.iter().map(RowSpec::split).collect();
    let max_left = splits.iter().map(|(l, _)| *l).max().unwrap_or(0);
    let max_right = splits.iter().map(|(_, r)| *r).max().unwrap_or(0);

    let status_of = |row: &str, number: u32| {
        if occupied.contains(row, number) {
            SeatStatus::Disabled
        } else if selected.contains(row, number) {
            SeatStatus::Selected
        } else {
            SeatStatus::Available
        }
    };
    let cell = |row: &str, number: u32| SeatCell {
        number,
        status: status_of(row, number),
        customer_name: None,
    };

    let layouts: Vec<RowLayout> = rows
        .iter()
        .zip(&splits)
        .map(|(spec, &(left, right))| {
            let total = spec.seats;
            let (left_pad, right_pad) = if options.align_aisle {
                (
                    (max_left - left) * options.unit_width,
                    (max_right - right) * options.unit_width,
                )
            } else {
                (0, 0)
            };

            RowLayout {
                name: spec.name.clone(),
                total_seats: total,
                left_seats: left,
                right_seats: right,
                left_block: (0..left).map(|i| cell(&spec.name, total - i)).collect(),
                right_block: (0..right).map(|i| cell(&spec.name, right - i)).collect(),
                left_pad,
                right_pad,
            }
        })
        .collect();

    let total_seats: u32 = rows.iter().map(|r| r.seats).sum();

    SeatMap {
        section: options.section.clone(),
        align_aisle: options.align_aisle,
        unit_width: options.unit_width,
        max_left_seats: max_left,
        max_right_seats: max_right,
        rows: layouts,
        total_seats,
        sold: occupied.len(),
        available: i64::from(total_seats) - occupied.len() as i64,
        selected: selected.len(),
        max_selection: options.max_selection,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Toggle {
    Added,
    Removed,
    Rejected,
}

/// Seats picked for one sale, bounded by `max_selection`
#[derive(Debug, Clone, PartialEq)]
pub struct SeatSelection {
    seats: Vec<Seat>,
    max_selection: usize,
    section: String,
}

impl SeatSelection {
    pub fn new(max_selection: usize, section: impl Into<String>) -> Self {
        Self::with_seats(Vec::new(), max_selection, section)
    }

    pub fn with_seats(seats: Vec<Seat>, max_selection: usize, section: impl Into<String>) -> Self {
        Self {
            seats,
            max_selection,
            section: section.into(),
        }
    }

    pub fn seats(&self) -> &[Seat] {
        &self.seats
    }

    pub fn into_seats(self) -> Vec<Seat> {
        self.seats
    }

    pub fn len(&self) -> usize {
        self.seats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seats.is_empty()
    }

    /// Flip membership of a seat. Occupied seats never toggle, and nothing is
    /// added once the selection is full.
    pub fn toggle(&mut self, row: &str, seat_number: u32, occupied: &SeatSet) -> Toggle {
        if occupied.contains(row, seat_number) {
            return Toggle::Rejected;
        }
        if let Some(pos) = self.seats.iter().position(|s| s.same_place(row, seat_number)) {
            self.seats.remove(pos);
            return Toggle::Removed;
        }
        if self.seats.len() >= self.max_selection {
            return Toggle::Rejected;
        }
        self.seats.push(Seat::new(row, seat_number, self.section.clone()));
        Toggle::Added
    }
}

/// Union of seats held by non-cancelled sales of a show, optionally leaving
/// out the sale being edited
pub fn occupied_seats<'a>(sales: &'a [Sale], show_id: &str, excluding_sale: Option<&str>) -> Vec<&'a Seat> {
    sales
        .iter()
        .filter(|s| s.show_id == show_id && s.status.counts())
        .filter(|s| excluding_sale != Some(s.id.as_str()))
        .flat_map(|s| s.seats.iter())
        .collect()
}

/// Seat to customer-name map for a show's occupied seats
pub fn seat_customers<F>(sales: &[Sale], show_id: &str, name_of: F) -> HashMap<(String, u32), String>
where
    F: Fn(&str) -> String,
{
    sales
        .iter()
        .filter(|s| s.show_id == show_id && s.status.counts())
        .flat_map(|sale| {
            let name = name_of(&sale.person_id);
            sale.seats.iter().map(move |seat| (seat.key(), name.clone()))
        })
        .collect()
}

/// Toggle request from the seat picker; `selected` is the client's current pick
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ToggleSeat {
    pub row: String,
    #[serde(alias = "seat")]
    pub seat_number: u32,
    #[serde(default)]
    pub selected: Vec<Seat>,
    /// Sale being edited, whose own seats stay selectable
    pub sale_id: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ToggleOutcome {
    pub result: Toggle,
    pub seats: Vec<Seat>,
}

#[derive(Clone)]
pub struct SeatingService {
    repository: Repository,
    venue: VenueConfig,
}

impl SeatingService {
    pub fn new(repository: Repository, venue: VenueConfig) -> Self {
        Self { repository, venue }
    }

    fn section_of(&self, show: &Show) -> String {
        if show.section.is_empty() {
            self.venue.section.clone()
        } else {
            show.section.clone()
        }
    }

    fn in_layout(&self, row: &str, seat_number: u32) -> bool {
        self.venue
            .rows
            .iter()
            .any(|r| r.name == row && r.contains(seat_number))
    }

    /// Seating chart of `show`, with holder names on occupied seats.
    ///
    /// When `editing` is set, that sale's seats are shown as selected rather
    /// than occupied and the selection is capped at its quantity.
    pub fn chart(&self, snapshot: &Snapshot, show: &Show, editing: Option<&Sale>) -> SeatMap {
        let occupied: SeatSet = occupied_seats(&snapshot.sales, &show.id, editing.map(|s| s.id.as_str()))
            .into_iter()
            .collect();
        let (selected, max_selection) = match editing {
            Some(sale) => (sale.seats.iter().collect(), sale.quantity as usize),
            None => (SeatSet::new(), self.venue.max_selection),
        };

        let options = SeatMapOptions {
            section: self.section_of(show),
            align_aisle: self.venue.align_aisle,
            max_selection,
            unit_width: self.venue.unit_width,
        };
        let mut map = build_seat_map(&self.venue.rows, &options, &occupied, &selected);
        map.annotate(&seat_customers(&snapshot.sales, &show.id, |id| snapshot.person_name(id)));
        map
    }

    /// Seat map for a show, optionally in edit mode for one of its sales
    pub async fn seat_map(&self, show_id: &str, sale_id: Option<&str>) -> AppResult<SeatMap> {
        let snapshot = self.repository.snapshot().await;
        let show = snapshot
            .show(show_id)
            .ok_or_else(|| AppError::NotFound(format!("Show with id {} not found", show_id)))?;
        let editing = match sale_id {
            Some(id) => Some(find_sale_of_show(&snapshot.sales, show_id, id)?),
            None => None,
        };

        Ok(self.chart(&snapshot, show, editing))
    }

    /// Apply one click of the seat picker to the client's current selection
    pub async fn toggle(&self, show_id: &str, request: ToggleSeat) -> AppResult<ToggleOutcome> {
        let snapshot = self.repository.snapshot().await;
        let show = snapshot
            .show(show_id)
            .ok_or_else(|| AppError::NotFound(format!("Show with id {} not found", show_id)))?;

        if !self.in_layout(&request.row, request.seat_number) {
            return Err(AppError::Validation(format!(
                "Seat {}{} does not exist",
                request.row, request.seat_number
            )));
        }

        let max_selection = match request.sale_id.as_deref() {
            Some(id) => find_sale_of_show(&snapshot.sales, show_id, id)?.quantity as usize,
            None => self.venue.max_selection,
        };
        let occupied: SeatSet = occupied_seats(&snapshot.sales, show_id, request.sale_id.as_deref())
            .into_iter()
            .collect();

        let mut selection = SeatSelection::with_seats(request.selected, max_selection, self.section_of(show));
        let result = selection.toggle(&request.row, request.seat_number, &occupied);

        Ok(ToggleOutcome {
            result,
            seats: selection.into_seats(),
        })
    }

    /// Check seats requested for a sale of `quantity` tickets and fill in
    /// missing sections.
    ///
    /// Every seat must exist in the layout, appear once and not be held by
    /// another non-cancelled sale of the show.
    pub fn check_seats(
        &self,
        sales: &[Sale],
        show: &Show,
        seats: Vec<Seat>,
        quantity: u32,
        sale_id: Option<&str>,
    ) -> AppResult<Vec<Seat>> {
        if seats.len() > quantity as usize {
            return Err(AppError::Validation(format!(
                "Cannot assign {} seats to {} tickets",
                seats.len(),
                quantity
            )));
        }

        let occupied: SeatSet = occupied_seats(sales, &show.id, sale_id).into_iter().collect();
        let section = self.section_of(show);
        let mut seen = SeatSet::new();

        seats
            .into_iter()
            .map(|mut seat| {
                if !self.in_layout(&seat.row, seat.seat_number) {
                    return Err(AppError::Validation(format!("Seat {} does not exist", seat)));
                }
                if occupied.contains(&seat.row, seat.seat_number) {
                    return Err(AppError::SeatTaken(seat.to_string()));
                }
                if !seen.insert(&seat) {
                    return Err(AppError::Validation(format!("Seat {} listed twice", seat)));
                }
                if seat.section.is_empty() {
                    seat.section = section.clone();
                }
                Ok(seat)
            })
            .collect()
    }

    /// Replace the seats of an existing sale
    pub async fn assign(&self, sale_id: &str, seats: Vec<Seat>) -> AppResult<Sale> {
        let _gate = self.repository.write_gate().await;
        let sale = self.repository.sales.get_by_id(sale_id).await?;
        let show = self.repository.shows.get_by_id(&sale.show_id).await?;
        let sales = self.repository.sales.for_show(&show.id).await;

        let seats = self.check_seats(&sales, &show, seats, sale.quantity, Some(sale_id))?;
        let sale = self
            .repository
            .sales
            .update(sale_id, |s| s.seats = seats)
            .await?;

        tracing::info!("Assigned {} seats to sale {}", sale.seats.len(), sale_id);
        Ok(sale)
    }
}

fn find_sale_of_show<'a>(sales: &'a [Sale], show_id: &str, sale_id: &str) -> AppResult<&'a Sale> {
    sales
        .iter()
        .find(|s| s.id == sale_id && s.show_id == show_id)
        .ok_or_else(|| AppError::NotFound(format!("Sale with id {} not found for this show", sale_id)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::sale::SaleStatus;
    use chrono::Utc;

    fn house() -> Vec<RowSpec> {
        vec![
            RowSpec::new("B", 9, Some(5)),
            RowSpec::new("C", 12, Some(6)),
            RowSpec::new("D", 9, Some(2)),
        ]
    }

    fn numbers(cells: &[SeatCell]) -> Vec<u32> {
        cells.iter().map(|c| c.number).collect()
    }

    fn aligned() -> SeatMapOptions {
        SeatMapOptions {
            align_aisle: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_block_numbering() {
        let map = build_seat_map(&house(), &aligned(), &SeatSet::new(), &SeatSet::new());
        let b = &map.rows[0];
        assert_eq!(numbers(&b.left_block), vec![9, 8, 7, 6, 5]);
        assert_eq!(numbers(&b.right_block), vec![4, 3, 2, 1]);
        let d = &map.rows[2];
        assert_eq!(numbers(&d.left_block), vec![9, 8]);
        assert_eq!(numbers(&d.right_block), vec![7, 6, 5, 4, 3, 2, 1]);
    }

    #[test]
    fn test_left_defaults_to_half_rounded_up() {
        let rows = vec![RowSpec::new("A", 7, None), RowSpec::new("E", 4, Some(0))];
        let map = build_seat_map(&rows, &SeatMapOptions::default(), &SeatSet::new(), &SeatSet::new());
        assert_eq!(numbers(&map.rows[0].left_block), vec![7, 6, 5, 4]);
        assert_eq!(numbers(&map.rows[0].right_block), vec![3, 2, 1]);
        assert_eq!((map.rows[1].left_seats, map.rows[1].right_seats), (2, 2));
    }

    #[test]
    fn test_aligned_aisles_share_offset() {
        let map = build_seat_map(&house(), &aligned(), &SeatSet::new(), &SeatSet::new());
        let offsets: Vec<u32> = map.rows.iter().map(|r| map.aisle_offset(r)).collect();
        assert_eq!(offsets, vec![6 * 37; 3]);
        assert_eq!((map.rows[0].left_pad, map.rows[0].right_pad), (37, 3 * 37));
        assert_eq!((map.rows[2].left_pad, map.rows[2].right_pad), (4 * 37, 0));
    }

    #[test]
    fn test_unaligned_rows_have_no_padding() {
        let map = build_seat_map(&house(), &SeatMapOptions::default(), &SeatSet::new(), &SeatSet::new());
        assert!(map.rows.iter().all(|r| r.left_pad == 0 && r.right_pad == 0));
    }

    #[test]
    fn test_status_and_totals() {
        let occupied: SeatSet = [Seat::new("B", 9, "South"), Seat::new("C", 1, "South")].iter().collect();
        let selected: SeatSet = [Seat::new("B", 9, "South"), Seat::new("B", 8, "South")].iter().collect();
        let map = build_seat_map(&house(), &aligned(), &occupied, &selected);

        let b = &map.rows[0];
        assert_eq!(b.left_block[0].status, SeatStatus::Disabled);
        assert_eq!(b.left_block[1].status, SeatStatus::Selected);
        assert_eq!(b.left_block[2].status, SeatStatus::Available);
        assert_eq!(map.total_seats, 30);
        assert_eq!(map.sold, 2);
        assert_eq!(map.available, 28);
    }

    #[test]
    fn test_empty_and_zero_rows() {
        let map = build_seat_map(&[], &aligned(), &SeatSet::new(), &SeatSet::new());
        assert!(map.rows.is_empty());
        assert_eq!((map.total_seats, map.available), (0, 0));

        let map = build_seat_map(&[RowSpec::new("Z", 0, None)], &aligned(), &SeatSet::new(), &SeatSet::new());
        assert!(map.rows[0].left_block.is_empty() && map.rows[0].right_block.is_empty());
        assert_eq!(map.total_seats, 0);
    }

    #[test]
    fn test_malformed_counts_default_to_zero() {
        let rows: Vec<RowSpec> = serde_json::from_str(
            r#"[{"name":"A","seats":-4},{"name":"B","totalSeats":"6","leftSeats":null},{"name":"C"},{"name":"D","seats":"many"}]"#,
        )
        .unwrap();
        assert_eq!(rows.iter().map(|r| r.seats).collect::<Vec<_>>(), vec![0, 6, 0, 0]);
        assert_eq!(rows[1].split(), (3, 3));
    }

    #[test]
    fn test_left_seats_clamped_to_row() {
        assert_eq!(RowSpec::new("A", 4, Some(9)).split(), (4, 0));
    }

    #[test]
    fn test_toggle_on_then_off_restores_selection() {
        let mut selection = SeatSelection::with_seats(vec![Seat::new("C", 6, "South")], 10, "South");
        let before = selection.clone();
        assert_eq!(selection.toggle("B", 4, &SeatSet::new()), Toggle::Added);
        assert_eq!(selection.toggle("B", 4, &SeatSet::new()), Toggle::Removed);
        assert_eq!(selection, before);
    }

    #[test]
    fn test_toggle_respects_max_and_occupancy() {
        let occupied: SeatSet = [Seat::new("B", 1, "South")].iter().collect();
        let mut selection = SeatSelection::new(2, "South");
        assert_eq!(selection.toggle("B", 1, &occupied), Toggle::Rejected);
        assert_eq!(selection.toggle("B", 2, &occupied), Toggle::Added);
        assert_eq!(selection.toggle("B", 3, &occupied), Toggle::Added);

        let full = selection.clone();
        assert_eq!(selection.toggle("B", 4, &occupied), Toggle::Rejected);
        assert_eq!(selection, full);
        // Removing still works when full
        assert_eq!(selection.toggle("B", 2, &occupied), Toggle::Removed);
        assert_eq!(selection.len(), 1);
    }

    #[test]
    fn test_rows_namespace_seat_numbers() {
        let occupied: SeatSet = [Seat::new("B", 5, "South")].iter().collect();
        let mut selection = SeatSelection::new(10, "South");
        assert_eq!(selection.toggle("C", 5, &occupied), Toggle::Added);
    }

    #[test]
    fn test_occupied_seats_skip_cancelled_and_edited_sales() {
        let sale = |id: &str, show: &str, status: SaleStatus, seats: Vec<Seat>| Sale {
            id: id.into(),
            show_id: show.into(),
            person_id: "p".into(),
            quantity: seats.len() as u32,
            status,
            payment_method: Default::default(),
            total_amount: 0.0,
            sale_date: Utc::now(),
            seats,
        };
        let sales = vec![
            sale("1", "s1", SaleStatus::Paid, vec![Seat::new("B", 1, "South")]),
            sale("2", "s1", SaleStatus::Cancelled, vec![Seat::new("B", 2, "South")]),
            sale("3", "s2", SaleStatus::Paid, vec![Seat::new("B", 3, "South")]),
            sale("4", "s1", SaleStatus::Reserved, vec![Seat::new("C", 4, "South")]),
        ];
        let all: SeatSet = occupied_seats(&sales, "s1", None).into_iter().collect();
        assert_eq!(all.len(), 2);
        assert!(all.contains("B", 1) && all.contains("C", 4));

        let editing: SeatSet = occupied_seats(&sales, "s1", Some("4")).into_iter().collect();
        assert!(!editing.contains("C", 4));

        let names = seat_customers(&sales, "s1", |_| "Ann".to_string());
        assert_eq!(names.get(&("B".to_string(), 1)).map(String::as_str), Some("Ann"));
        assert!(!names.contains_key(&("B".to_string(), 2)));
    }

    #[test]
    fn test_annotate_sets_customer_names() {
        let occupied: SeatSet = [Seat::new("D", 9, "South")].iter().collect();
        let mut map = build_seat_map(&house(), &aligned(), &occupied, &SeatSet::new());
        let mut names = HashMap::new();
        names.insert(("D".to_string(), 9), "Ruth".to_string());
        map.annotate(&names);
        assert_eq!(map.rows[2].left_block[0].customer_name.as_deref(), Some("Ruth"));
        assert!(map.rows[0].left_block[0].customer_name.is_none());
    }

    fn service() -> SeatingService {
        let repository = Repository::open(
            std::sync::Arc::new(crate::repository::store::MemoryStore::new()),
            "test",
        )
        .unwrap();
        SeatingService::new(repository, VenueConfig::default())
    }

    fn show() -> Show {
        serde_json::from_value(serde_json::json!({
            "id": "s1", "title": "Our Town", "date": "2026-11-20",
            "price": 20, "maxTickets": 30, "section": "South"
        }))
        .unwrap()
    }

    fn held(id: &str, seats: Vec<Seat>) -> Sale {
        Sale {
            id: id.into(),
            show_id: "s1".into(),
            person_id: "p".into(),
            quantity: 2,
            status: SaleStatus::Paid,
            payment_method: Default::default(),
            total_amount: 40.0,
            sale_date: Utc::now(),
            seats,
        }
    }

    #[test]
    fn test_check_seats_fills_section() {
        let seats = service()
            .check_seats(&[], &show(), vec![Seat::new("B", 9, "")], 1, None)
            .unwrap();
        assert_eq!(seats, vec![Seat::new("B", 9, "South")]);
    }

    #[test]
    fn test_check_seats_rejects_bad_requests() {
        let svc = service();
        let sales = vec![held("other", vec![Seat::new("C", 3, "South")])];

        let taken = svc.check_seats(&sales, &show(), vec![Seat::new("C", 3, "")], 2, None);
        assert!(matches!(taken, Err(AppError::SeatTaken(seat)) if seat == "C3"));

        let missing = svc.check_seats(&sales, &show(), vec![Seat::new("B", 10, "")], 2, None);
        assert!(matches!(missing, Err(AppError::Validation(_))));

        let too_many = svc.check_seats(
            &sales,
            &show(),
            vec![Seat::new("B", 1, ""), Seat::new("B", 2, ""), Seat::new("B", 3, "")],
            2,
            None,
        );
        assert!(matches!(too_many, Err(AppError::Validation(_))));

        let twice = svc.check_seats(&sales, &show(), vec![Seat::new("B", 1, ""), Seat::new("B", 1, "")], 2, None);
        assert!(matches!(twice, Err(AppError::Validation(_))));

        // A sale keeps its own seats when edited
        let own = svc.check_seats(&sales, &show(), vec![Seat::new("C", 3, "")], 2, Some("other"));
        assert!(own.is_ok());
    }

    #[test]
    fn test_chart_in_edit_mode() {
        let svc = service();
        let snapshot = Snapshot {
            shows: vec![show()],
            sales: vec![
                held("a", vec![Seat::new("B", 9, "South")]),
                held("b", vec![Seat::new("B", 8, "South")]),
            ],
            ..Default::default()
        };
        let editing = &snapshot.sales[1];
        let map = svc.chart(&snapshot, &snapshot.shows[0], Some(editing));
        let b = &map.rows[0];
        assert_eq!(b.left_block[0].status, SeatStatus::Disabled);
        assert_eq!(b.left_block[1].status, SeatStatus::Selected);
        assert_eq!(b.left_block[0].customer_name.as_deref(), Some("Unknown"));
        // Seats of the sale being edited are not shown as held by anyone
        assert!(b.left_block[1].customer_name.is_none());
        assert_eq!(map.max_selection, 2);
    }
}
