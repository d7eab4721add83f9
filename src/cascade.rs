use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    columns::ColumnLabels,
    table::{Table, ValueOrder},
};

/// One selected value per filter dimension; `None` is unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selections {
    pub plot: Option<String>,
    pub village_unit: Option<String>,
    pub ward: Option<String>,
}

/// Option list per filter control; `None` when the column is absent and the
/// control is omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
    pub plot: Option<Vec<String>>,
    pub village_unit: Option<Vec<String>>,
    pub ward: Option<Vec<String>>,
}

/// Result of running the filter chain over the full table.
#[derive(Debug, Clone)]
pub struct Cascade {
    /// Filtered rows, priority columns first.
    pub table: Table,
    pub options: FilterOptions,
    /// Selections that were actually applied. A requested value that is not
    /// among its control's options is dropped here.
    pub applied: Selections,
}

impl Cascade {
    pub fn row_count(&self) -> usize {
        self.table.num_rows()
    }
}

/// Apply plot, then village unit, then ward.
///
/// Plot and village-unit options come from the full table. Ward options come
/// from the rows left after the plot and village-unit filters, so they can
/// never be staler than the selections above them.
pub fn run(full: &Table, labels: &ColumnLabels, wanted: &Selections) -> Result<Cascade> {
    let mut current = full.clone();
    let mut applied = Selections::default();

    let plot_options = full.distinct(&labels.plot, ValueOrder::Lexicographic);
    applied.plot = keep_if_offered("plot", &wanted.plot, &plot_options);
    if let Some(plot) = &applied.plot {
        current = current.filter_eq(&labels.plot, plot)?;
    }

    let village_options = full.distinct(&labels.village_unit, ValueOrder::Lexicographic);
    applied.village_unit = keep_if_offered("village_unit", &wanted.village_unit, &village_options);
    if let Some(village) = &applied.village_unit {
        current = current.filter_eq(&labels.village_unit, village)?;
    }

    let ward_options = current.distinct(&labels.ward, ValueOrder::Natural);
    applied.ward = keep_if_offered("ward", &wanted.ward, &ward_options);
    if let Some(ward) = &applied.ward {
        current = current.filter_eq(&labels.ward, ward)?;
    }

    let table = current.with_leading_columns(&labels.leading())?;

    Ok(Cascade {
        table,
        options: FilterOptions {
            plot: plot_options,
            village_unit: village_options,
            ward: ward_options,
        },
        applied,
    })
}

fn keep_if_offered(
    dimension: &str,
    wanted: &Option<String>,
    options: &Option<Vec<String>>,
) -> Option<String> {
    let value = wanted.as_ref()?;
    match options {
        Some(options) if options.iter().any(|o| o == value) => Some(value.clone()),
        Some(_) => {
            debug!(dimension, value = %value, "dropping selection not among current options");
            None
        }
        None => {
            debug!(dimension, value = %value, "dropping selection for absent column");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::columns::{LAND_USE, PLOT, VILLAGE_UNIT, WARD};

    fn sel(plot: Option<&str>, village: Option<&str>, ward: Option<&str>) -> Selections {
        Selections {
            plot: plot.map(str::to_string),
            village_unit: village.map(str::to_string),
            ward: ward.map(str::to_string),
        }
    }

    /// Land use first so reordering is observable.
    fn parcels() -> Table {
        Table::from_rows(
            &[LAND_USE, WARD, PLOT, "क्षेत्रफल", VILLAGE_UNIT],
            &[
                vec![Some("कृषि"), Some("1"), Some("101"), Some("0-2-0"), Some("A")],
                vec![Some("आवासीय"), Some("2"), Some("102"), Some("0-1-2"), Some("A")],
                vec![Some("कृषि"), Some("2"), Some("103"), None, Some("A")],
                vec![Some("व्यावसायिक"), Some("1"), Some("104"), Some("1-0-0"), Some("B")],
                vec![Some("कृषि"), Some("1"), Some("101"), Some("0-0-3"), Some("B")],
                vec![Some("वन"), None, None, None, None],
            ],
        )
        .unwrap()
    }

    fn labels() -> ColumnLabels {
        ColumnLabels::default()
    }

    #[test]
    fn test_ward_options_depend_on_village_unit() {
        let t = parcels();

        let a = run(&t, &labels(), &sel(None, Some("A"), None)).unwrap();
        assert_eq!(a.options.ward.clone().unwrap(), vec!["1", "2"]);
        assert_eq!(a.row_count(), 3);

        let b = run(&t, &labels(), &sel(None, Some("B"), None)).unwrap();
        assert_eq!(b.options.ward.clone().unwrap(), vec!["1"]);
        assert_eq!(b.row_count(), 2);
    }

    #[test]
    fn test_plot_options_ignore_other_filters() {
        let t = parcels();
        let expected = vec!["101", "102", "103", "104"];
        for s in [
            sel(None, None, None),
            sel(None, Some("B"), None),
            sel(Some("102"), Some("A"), Some("2")),
        ] {
            let c = run(&t, &labels(), &s).unwrap();
            assert_eq!(c.options.plot.as_deref().unwrap(), expected.as_slice());
            assert_eq!(
                c.options.village_unit.as_deref().unwrap(),
                ["A".to_string(), "B".to_string()].as_slice()
            );
        }
    }

    #[test]
    fn test_ward_options_follow_plot_and_village_unit() {
        let t = parcels();
        let c = run(&t, &labels(), &sel(Some("101"), None, None)).unwrap();
        assert_eq!(c.options.ward.clone().unwrap(), vec!["1"]);
        assert_eq!(c.row_count(), 2);

        let c = run(&t, &labels(), &sel(None, None, None)).unwrap();
        assert_eq!(c.options.ward.clone().unwrap(), vec!["1", "2"]);
        assert_eq!(c.row_count(), 6);
    }

    #[test]
    fn test_narrowing_never_grows_row_count() {
        let t = parcels();
        let steps = [
            sel(None, None, None),
            sel(Some("101"), None, None),
            sel(Some("101"), Some("A"), None),
            sel(Some("101"), Some("A"), Some("1")),
        ];
        let counts: Vec<usize> = steps
            .iter()
            .map(|s| run(&t, &labels(), s).unwrap().row_count())
            .collect();
        assert_eq!(counts, vec![6, 2, 1, 1]);
        assert!(counts.windows(2).all(|w| w[1] <= w[0]));
    }

    #[test]
    fn test_unsetting_restores_rows_and_options() {
        let t = parcels();
        let narrowed = run(&t, &labels(), &sel(None, Some("B"), Some("1"))).unwrap();
        assert_eq!(narrowed.row_count(), 2);

        // unset the village unit, keep ward 1
        let widened = run(&t, &labels(), &sel(None, None, Some("1"))).unwrap();
        let ward_only = t
            .filter_eq(WARD, "1")
            .unwrap()
            .with_leading_columns(&labels().leading())
            .unwrap();
        assert_eq!(widened.table.rows(), ward_only.rows());
        assert_ne!(widened.table.rows(), narrowed.table.rows());
        assert_eq!(widened.options.ward.clone().unwrap(), vec!["1", "2"]);
        assert_eq!(widened.row_count(), 3);
    }

    #[test]
    fn test_stale_ward_selection_is_dropped() {
        let t = parcels();
        // ward 2 does not exist under B
        let c = run(&t, &labels(), &sel(None, Some("B"), Some("2"))).unwrap();
        assert_eq!(c.applied, sel(None, Some("B"), None));
        assert_eq!(c.row_count(), 2);

        let c = run(&t, &labels(), &sel(Some("999"), None, None)).unwrap();
        assert_eq!(c.applied.plot, None);
        assert_eq!(c.row_count(), 6);
    }

    #[test]
    fn test_priority_columns_lead() {
        let t = parcels();
        let c = run(&t, &labels(), &Selections::default()).unwrap();
        assert_eq!(
            c.table.column_names(),
            vec![PLOT, VILLAGE_UNIT, WARD, LAND_USE, "क्षेत्रफल"]
        );
    }

    #[test]
    fn test_missing_ward_column_omits_control() {
        let t = Table::from_rows(
            &[PLOT, VILLAGE_UNIT, LAND_USE],
            &[vec![Some("101"), Some("A"), Some("कृषि")]],
        )
        .unwrap();
        let c = run(&t, &labels(), &sel(None, Some("A"), Some("1"))).unwrap();
        assert!(c.options.ward.is_none());
        assert!(c.options.plot.is_some());
        assert_eq!(c.applied, sel(None, Some("A"), None));
        assert_eq!(c.row_count(), 1);
    }
}
