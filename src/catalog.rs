//! Static recipe catalog, loaded once at startup

use crate::models::{Category, CriticalPoints, JarSterilizationTime, Preserve};

/// Sterilization table shared by every recipe in the catalog
fn sterilization_times() -> Vec<JarSterilizationTime> {
    vec![
        jar("Frasco Amanecer 1000cc", 45, "https://picsum.photos/seed/jar1/200"),
        jar("Bote 1000cc", 45, "https://picsum.photos/seed/can1/200"),
        jar("Frasco Amanecer 360cc", 25, "https://picsum.photos/seed/jar2/200"),
        jar("Bote 433cc", 30, "https://picsum.photos/seed/can2/200"),
    ]
}

fn jar(name: &str, minutes: u32, image: &str) -> JarSterilizationTime {
    JarSterilizationTime {
        name: name.to_string(),
        minutes,
        image: image.to_string(),
    }
}

fn preserve(id: &str, name: &str, image: &str, ph: Option<&str>, brix: Option<&str>) -> Preserve {
    let critical_points = if ph.is_none() && brix.is_none() {
        None
    } else {
        Some(CriticalPoints {
            ph: ph.map(str::to_string),
            brix: brix.map(str::to_string),
        })
    };
    Preserve {
        id: id.to_string(),
        name: name.to_string(),
        image: image.to_string(),
        critical_points,
        sterilization_times: sterilization_times(),
    }
}

fn category(id: &str, name: &str, image: &str, preserves: Vec<Preserve>) -> Category {
    Category {
        id: id.to_string(),
        name: name.to_string(),
        image: image.to_string(),
        preserves,
    }
}

/// Builds the full category list. Immutable for the process lifetime.
pub fn categories() -> Vec<Category> {
    vec![
        category(
            "mermeladas",
            "Mermeladas",
            "https://picsum.photos/seed/cat-jam/400/300",
            vec![
                preserve(
                    "mermelada-frutilla",
                    "Mermelada de Frutilla",
                    "https://picsum.photos/seed/jam-strawberry/400/300",
                    Some("Menor a 3,8"),
                    Some("Mínimo 65° Brix"),
                ),
                preserve(
                    "mermelada-durazno",
                    "Mermelada de Durazno",
                    "https://picsum.photos/seed/jam-peach/400/300",
                    Some("Menor a 3,8"),
                    Some("Mínimo 65° Brix"),
                ),
                preserve(
                    "mermelada-pera",
                    "Mermelada de Pera",
                    "https://picsum.photos/seed/jam-pear/400/300",
                    Some("Menor a 3,8"),
                    Some("Mínimo 65° Brix"),
                ),
                preserve(
                    "mermelada-alcayota",
                    "Mermelada de Alcayota",
                    "https://picsum.photos/seed/jam-squash/400/300",
                    Some("Menor a 3,8"),
                    Some("Mínimo 65° Brix"),
                ),
            ],
        ),
        category(
            "jaleas",
            "Jaleas",
            "https://picsum.photos/seed/cat-jelly/400/300",
            vec![
                preserve(
                    "jalea-membrillo",
                    "Jalea de Membrillo",
                    "https://picsum.photos/seed/jelly-quince/400/300",
                    Some("Menor a 3,5"),
                    Some("Mínimo 65° Brix"),
                ),
                preserve(
                    "jalea-manzana",
                    "Jalea de Manzana",
                    "https://picsum.photos/seed/jelly-apple/400/300",
                    Some("Menor a 3,5"),
                    Some("Mínimo 65° Brix"),
                ),
            ],
        ),
        category(
            "dulces",
            "Dulces",
            "https://picsum.photos/seed/cat-sweets/400/300",
            vec![
                preserve(
                    "dulce-membrillo",
                    "Dulce de Membrillo",
                    "https://picsum.photos/seed/sweet-quince/400/300",
                    None,
                    Some("Mínimo 75° Brix"),
                ),
                preserve(
                    "dulce-batata",
                    "Dulce de Batata",
                    "https://picsum.photos/seed/sweet-potato/400/300",
                    None,
                    Some("Mínimo 75° Brix"),
                ),
            ],
        ),
        category(
            "frutas-almibar",
            "Frutas en almíbar",
            "https://picsum.photos/seed/cat-syrup/400/300",
            vec![
                preserve(
                    "duraznos-almibar",
                    "Duraznos en almíbar",
                    "https://picsum.photos/seed/syrup-peach/400/300",
                    Some("Menor a 4,3"),
                    Some("Entre 25-35° Brix"),
                ),
                preserve(
                    "peras-almibar",
                    "Peras en almíbar",
                    "https://picsum.photos/seed/syrup-pear/400/300",
                    Some("Menor a 4,3"),
                    Some("Entre 25-35° Brix"),
                ),
            ],
        ),
        category(
            "triturados",
            "Triturados",
            "https://picsum.photos/seed/cat-crushed/400/300",
            vec![
                preserve(
                    "tomate-triturado",
                    "Tomate triturado",
                    "https://picsum.photos/seed/crushed-tomato/400/300",
                    Some("Menor a 4,5"),
                    None,
                ),
                preserve(
                    "pimiento-triturado",
                    "Pimiento triturado (morrones)",
                    "https://picsum.photos/seed/crushed-pepper/400/300",
                    Some("Menor a 4,5"),
                    None,
                ),
            ],
        ),
        category(
            "encurtidos",
            "Encurtidos",
            "https://picsum.photos/seed/cat-pickles/400/300",
            vec![
                preserve(
                    "pepinillos-vinagre",
                    "Pepinillos en vinagre",
                    "https://picsum.photos/seed/pickle-cucumber/400/300",
                    Some("Menor a 4,0"),
                    None,
                ),
                preserve(
                    "cebollitas-vinagre",
                    "Cebollitas en vinagre",
                    "https://picsum.photos/seed/pickle-onion/400/300",
                    Some("Menor a 4,0"),
                    None,
                ),
            ],
        ),
        category(
            "salsas",
            "Salsas",
            "https://picsum.photos/seed/cat-sauces/400/300",
            vec![
                preserve(
                    "salsa-tomate",
                    "Salsa de Tomate",
                    "https://picsum.photos/seed/sauce-tomato/400/300",
                    Some("Menor a 4,5"),
                    None,
                ),
                preserve(
                    "ketchup-casero",
                    "Kétchup Casero",
                    "https://picsum.photos/seed/sauce-ketchup/400/300",
                    Some("Menor a 4,0"),
                    None,
                ),
            ],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_category_ids_unique() {
        let cats = categories();
        let ids: HashSet<&str> = cats.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids.len(), cats.len());
    }

    #[test]
    fn test_preserve_ids_unique_across_catalog() {
        let cats = categories();
        let all: Vec<&str> = cats
            .iter()
            .flat_map(|c| c.preserves.iter().map(|p| p.id.as_str()))
            .collect();
        let unique: HashSet<&str> = all.iter().copied().collect();
        assert_eq!(unique.len(), all.len());
        assert_eq!(all.len(), 16);
    }

    #[test]
    fn test_every_category_has_preserves() {
        for cat in categories() {
            assert!(!cat.preserves.is_empty(), "category {} is empty", cat.id);
        }
    }

    #[test]
    fn test_every_preserve_has_sterilization_table() {
        for cat in categories() {
            for p in &cat.preserves {
                assert_eq!(p.sterilization_times.len(), 4, "preserve {}", p.id);
                assert_eq!(p.sterilization_times[0].name, "Frasco Amanecer 1000cc");
                assert_eq!(p.sterilization_times[0].minutes, 45);
                assert_eq!(p.sterilization_times[2].minutes, 25);
            }
        }
    }

    #[test]
    fn test_strawberry_jam_critical_points() {
        let cats = categories();
        let jam = cats[0]
            .preserves
            .iter()
            .find(|p| p.id == "mermelada-frutilla")
            .unwrap();
        let points = jam.critical_points.as_ref().unwrap();
        assert_eq!(points.ph.as_deref(), Some("Menor a 3,8"));
        assert_eq!(points.brix.as_deref(), Some("Mínimo 65° Brix"));
    }

    #[test]
    fn test_crushed_tomato_has_no_brix() {
        let cats = categories();
        let tomato = cats
            .iter()
            .flat_map(|c| c.preserves.iter())
            .find(|p| p.id == "tomate-triturado")
            .unwrap();
        let points = tomato.critical_points.as_ref().unwrap();
        assert_eq!(points.ph.as_deref(), Some("Menor a 4,5"));
        assert!(points.brix.is_none());
    }
}
