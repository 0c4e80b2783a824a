use crate::model::Parcel;
use crate::report::block::Block;
use crate::report::style::ReportStyle;
use crate::utils::format_date;

pub fn render(parcel: &Parcel, style: &ReportStyle) -> Vec<Block> {
    let crop = parcel
        .crop_type
        .clone()
        .unwrap_or_else(|| style.unspecified_label.clone());
    let centroid = match parcel.centroid {
        Some((lat, lon)) => format!("{:.6}, {:.6}", lat, lon),
        None => style.unavailable_label.clone(),
    };
    let start = parcel
        .monitoring_start
        .map(format_date)
        .unwrap_or_else(|| style.unspecified_label.clone());

    vec![
        Block::heading("Información de la Parcela"),
        Block::KeyValueTable(vec![
            ("Nombre".into(), parcel.name.clone()),
            ("Propietario".into(), parcel.owner.clone()),
            ("Tipo de cultivo".into(), crop),
            ("Superficie".into(), format!("{:.2} hectáreas", parcel.area_hectares)),
            ("Centroide (lat, lon)".into(), centroid),
            ("Inicio del monitoreo".into(), start),
        ]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn rows(blocks: &[Block]) -> Vec<(String, String)> {
        match &blocks[1] {
            Block::KeyValueTable(rows) => rows.clone(),
            other => panic!("unexpected block {:?}", other),
        }
    }

    #[test]
    fn optional_fields_use_fallback_labels() {
        let style = ReportStyle::default();
        let parcel = Parcel {
            id: 3,
            name: "El Olivar".into(),
            owner: "Coop. Sur".into(),
            crop_type: None,
            area_hectares: 4.0,
            centroid: None,
            monitoring_start: None,
            active: true,
        };
        let rows = rows(&render(&parcel, &style));
        assert_eq!(rows[2].1, "No especificado");
        assert_eq!(rows[3].1, "4.00 hectáreas");
        assert_eq!(rows[4].1, "No disponible");
        assert_eq!(rows[5].1, "No especificado");
    }

    #[test]
    fn present_fields_are_formatted() {
        let parcel = Parcel {
            id: 3,
            name: "El Olivar".into(),
            owner: "Coop. Sur".into(),
            crop_type: Some("Olivo".into()),
            area_hectares: 4.25,
            centroid: Some((-34.5, -58.25)),
            monitoring_start: NaiveDate::from_ymd_opt(2022, 3, 1),
            active: true,
        };
        let rows = rows(&render(&parcel, &ReportStyle::default()));
        assert_eq!(rows[2].1, "Olivo");
        assert_eq!(rows[4].1, "-34.500000, -58.250000");
        assert_eq!(rows[5].1, "01/03/2022");
    }
}
