//! Result projection into fixed display sections.
//!
//! The section layout is a static table, not derived from data: each
//! section names the columns it may show, and only the ones present in the
//! dataset are kept, in the section's configured order. Formatting is
//! presentation-only and happens on the projected copy; the dataset itself
//! is untouched.

use serde::Serialize;

use crate::dataset::{Cell, Dataset};

/// Fixed section layout, in display order.
const SECTIONS: &[(&str, &[&str])] = &[
    ("Informações principais", &["RAZAO_SOCIAL", "CNPJ", "COD_JC"]),
    ("Classificação", &["FAIXA PEX", "FAIXA SORT", "DGTT", "AMBIENTE"]),
    ("Perfil", &["PERFIL", "GRUPO", "COLIGAÇÃO"]),
    (
        "Resumo vendas",
        &[
            "POTENCIAL",
            "OPORT_AGO",
            "OPORT_SET",
            "MD_TRI_COLG",
            "REAL_MES_COLG",
        ],
    ),
    (
        "Vendas JC",
        &["MD_TRI_3M", "REAL_MES_3M", "MD_TRI_JC", "REAL_MES_JC"],
    ),
    ("Informações adicionais", &["SEGMENTO", "CIDADE"]),
    ("Gestores comerciais", &["SUPERVISOR", "VENDEDOR"]),
];

/// Columns rendered as BRL currency.
const MONEY_COLUMNS: &[&str] = &[
    "POTENCIAL",
    "OPORT_AGO",
    "OPORT_SET",
    "MD_TRI_COLG",
    "REAL_MES_COLG",
    "MD_TRI_3M",
    "REAL_MES_3M",
    "MD_TRI_JC",
    "REAL_MES_JC",
];

/// One projected section: a title plus the kept columns and their
/// formatted values, one row per matched record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    pub title: &'static str,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Project matched rows into the fixed sections.
///
/// Sections whose configured columns are all absent from the dataset are
/// omitted entirely; section order never depends on the data.
#[must_use]
pub fn project(dataset: &Dataset, matches: &[usize]) -> Vec<Section> {
    SECTIONS
        .iter()
        .filter_map(|&(title, columns)| {
            let present: Vec<(usize, &str)> = columns
                .iter()
                .filter_map(|&name| dataset.column_index(name).map(|index| (index, name)))
                .collect();

            if present.is_empty() {
                return None;
            }

            let rows = matches
                .iter()
                .map(|&row| {
                    present
                        .iter()
                        .map(|&(index, name)| render(dataset.cell(row, index), name))
                        .collect()
                })
                .collect();

            Some(Section {
                title,
                columns: present.iter().map(|&(_, name)| name.to_string()).collect(),
                rows,
            })
        })
        .collect()
}

/// Presentation rule for one cell.
///
/// Monetary columns become `R$ 1,234.56`; a missing value renders as the
/// empty string, never `NaN` or `R$ 0.00`. Identifier columns and
/// everything else keep their loaded string form, leading zeros and
/// punctuation included.
fn render(cell: &Cell, column: &str) -> String {
    if MONEY_COLUMNS.contains(&column) {
        return match cell {
            Cell::Number(value) => format_money(*value),
            Cell::Text(text) => text.clone(),
            Cell::Empty => String::new(),
        };
    }

    cell.display()
}

/// BRL currency string with two decimals and comma thousands grouping.
#[must_use]
pub fn format_money(value: f64) -> String {
    let cents = (value.abs() * 100.0).round() as u64;
    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };

    format!(
        "R$ {sign}{}.{:02}",
        group_thousands(cents / 100),
        cents % 100
    )
}

fn group_thousands(mut value: u64) -> String {
    let mut groups = Vec::new();

    loop {
        let group = value % 1000;
        value /= 1000;
        if value == 0 {
            groups.push(group.to_string());
            break;
        }
        groups.push(format!("{group:03}"));
    }

    groups.reverse();
    groups.join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset() -> Dataset {
        Dataset::from_csv(
            "RAZAO_SOCIAL,CNPJ,COD_JC,POTENCIAL,SEGMENTO\n\
             ACME LTDA,12.345.678/0001-90,00123,1234.56,VAREJO\n\
             BETA SA,98.765.432/0001-10,456,,ATACADO\n",
        )
        .unwrap()
    }

    fn section<'a>(sections: &'a [Section], title: &str) -> &'a Section {
        sections
            .iter()
            .find(|s| s.title == title)
            .unwrap_or_else(|| panic!("missing section {title}"))
    }

    #[test]
    fn money_formatting() {
        assert_eq!(format_money(1234.56), "R$ 1,234.56");
        assert_eq!(format_money(0.0), "R$ 0.00");
        assert_eq!(format_money(1500.5), "R$ 1,500.50");
        assert_eq!(format_money(1_000_000.0), "R$ 1,000,000.00");
        assert_eq!(format_money(-1234.56), "R$ -1,234.56");
        assert_eq!(format_money(999.999), "R$ 1,000.00");
    }

    #[test]
    fn sections_without_any_present_column_are_omitted() {
        let sections = project(&dataset(), &[0, 1]);
        let titles: Vec<&str> = sections.iter().map(|s| s.title).collect();

        assert_eq!(
            titles,
            [
                "Informações principais",
                "Resumo vendas",
                "Informações adicionais"
            ],
            "fixed order, absent sections dropped"
        );
    }

    #[test]
    fn identifiers_keep_their_loaded_form() {
        let sections = project(&dataset(), &[0, 1]);
        let main = section(&sections, "Informações principais");

        assert_eq!(main.columns, ["RAZAO_SOCIAL", "CNPJ", "COD_JC"]);
        assert_eq!(main.rows[0], ["ACME LTDA", "12.345.678/0001-90", "00123"]);
        assert_eq!(main.rows[1][2], "456");
    }

    #[test]
    fn missing_money_renders_empty_not_nan() {
        let sections = project(&dataset(), &[0, 1]);
        let sales = section(&sections, "Resumo vendas");

        assert_eq!(sales.rows[0], ["R$ 1,234.56"]);
        assert_eq!(sales.rows[1], [""], "missing value is empty, not R$ 0.00");
    }

    #[test]
    fn non_numeric_text_in_money_column_passes_through() {
        let dataset = Dataset::from_csv("POTENCIAL\nisento\n").unwrap();
        let sections = project(&dataset, &[0]);
        assert_eq!(sections[0].rows[0], ["isento"]);
    }

    #[test]
    fn projection_follows_the_match_subset() {
        let sections = project(&dataset(), &[1]);
        let main = section(&sections, "Informações principais");

        assert_eq!(main.rows.len(), 1);
        assert_eq!(main.rows[0][0], "BETA SA");
    }

    #[test]
    fn empty_match_set_projects_empty_rows() {
        let sections = project(&dataset(), &[]);
        assert!(sections.iter().all(|s| s.rows.is_empty()));
        assert!(!sections.is_empty(), "sections depend on columns, not rows");
    }

    #[test]
    fn projection_does_not_touch_the_dataset() {
        let dataset = dataset();
        let before = dataset.clone();
        let _ = project(&dataset, &[0, 1]);
        assert_eq!(dataset, before);
    }
}
