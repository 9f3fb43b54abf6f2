use survey_topics::Dataset;

/// The responses used when no spreadsheet is available. Every selection widget gets
/// at least one value.
pub fn example_dataset() -> Dataset {
    let header: Vec<String> = [
        "Departamento",
        "Lotação",
        "Em quais conhecimentos",
        "Que tipos de treinamentos",
        "Gostaria de sugerir",
        "Que formato de treinamento",
        "Qual o melhor período",
        "Você sente que está preparado",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();
    let rows: Vec<Vec<Option<String>>> = [
        [
            "Comercial",
            "Sede",
            "Excel avançado",
            "Técnico",
            "CPA 20",
            "Online",
            "Manhã",
            "Sim",
        ],
        [
            "Administrativo",
            "Agência",
            "Gestão de pessoas",
            "Comportamental",
            "Oratória",
            "Presencial",
            "Tarde",
            "Em partes",
        ],
        [
            "TI",
            "Sede",
            "Power BI",
            "Técnico",
            "Excel VBA",
            "Híbrido",
            "Integral",
            "Não",
        ],
        [
            "Financeiro",
            "Agência",
            "SISBR",
            "Técnico",
            "Crédito Rural",
            "Presencial",
            "Manhã",
            "Em partes",
        ],
    ]
    .iter()
    .map(|r| r.iter().map(|s| Some(s.to_string())).collect())
    .collect();
    Dataset::new(&header, rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use survey_topics::*;

    #[test]
    fn four_rows_all_fields() {
        let ds = example_dataset();
        assert_eq!(ds.len(), 4);
        for f in Field::ALL {
            assert!(ds.columns().is_resolved(f), "{:?}", f);
        }
        assert_eq!(
            ds.distinct_values(Field::Site),
            vec!["Agência".to_string(), "Sede".to_string()]
        );
        assert_eq!(ds.value(&ds.rows()[3], Field::KnowledgeGaps), Some("SISBR"));
    }

    #[test]
    fn example_topics() {
        let ds = example_dataset();
        let counts = TopicTable::builtin().count(&FilteredView::all(&ds));
        let get = |name: &str| counts.iter().find(|tc| tc.name == name).unwrap().count;
        // "Excel avançado", "Power BI" and "Excel VBA" in two rows
        assert_eq!(get("Power BI/Excel/HP12C"), 2);
        assert_eq!(get("Investimentos/CPA/CEA"), 1);
        assert_eq!(get("Gestão e Liderança"), 1);
        assert_eq!(get("Oratória/Comunicação"), 1);
        assert_eq!(get("Sistemas (SISBR/SIGAS)"), 1);
        assert_eq!(get("Crédito Rural"), 1);
        assert_eq!(counts[0].name, "Power BI/Excel/HP12C");
    }

    #[test]
    fn keyword_on_example() {
        let ds = example_dataset();
        let view = filter_rows(&ds, &Selection::new().with_keyword("SISBR"));
        assert_eq!(view.indices(), &[3]);
        let view = filter_rows(&ds, &Selection::new().with_keyword("credito"));
        assert_eq!(view.indices(), &[3]);
    }
}
