//! Join emulation and projection reads.

use crate::catalog::Catalog;
use crate::error::CatalogResult;
use crate::model::{Bottle, BottleSummary, Ref, Region};
use cavadb_store::DocumentId;
use std::collections::HashMap;

impl Catalog {
    /// Lists every bottle with its region reference resolved inline.
    ///
    /// Join emulation in a single read pass: one scan of regions into
    /// an id map, then one scan of bottles, never a per-bottle region
    /// fetch. Left-join semantics: a bottle with no region, or whose
    /// region id resolves to nothing, is kept with its reference
    /// as-is rather than dropped. Reviews stay lazy.
    pub fn list_bottles_with_region_eager(&self) -> CatalogResult<Vec<Bottle>> {
        let regions: HashMap<DocumentId, Region> = self
            .regions
            .find_all()?
            .into_iter()
            .filter_map(|region| region.id.map(|id| (id, region)))
            .collect();

        let mut bottles = self.bottles.find_all()?;
        for bottle in &mut bottles {
            if let Some(region_ref) = &mut bottle.region_ref {
                let resolved = match region_ref {
                    Ref::Unresolved(region_id) => regions.get(region_id).cloned(),
                    Ref::Resolved(_) => None,
                };
                if let Some(region) = resolved {
                    *region_ref = Ref::Resolved(region);
                }
            }
        }
        Ok(bottles)
    }

    /// Lists every bottle as a `{name, vintage_year, color}` summary.
    ///
    /// Pure field projection, no join: region and review data are
    /// never populated, whatever the stored records hold.
    pub fn list_bottle_summaries(&self) -> CatalogResult<Vec<BottleSummary>> {
        Ok(self.bottles.find_all_projected()?)
    }

    /// Lists every bottle of a given color.
    pub fn find_bottles_by_color(&self, label: &str) -> CatalogResult<Vec<Bottle>> {
        Ok(self
            .bottles
            .find_where(|bottle| bottle.color.as_ref().is_some_and(|c| c.label == label))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Color;
    use cavadb_store::DocumentStore;

    fn catalog() -> Catalog {
        let store = DocumentStore::in_memory();
        Catalog::open(&store).unwrap()
    }

    #[test]
    fn eager_listing_resolves_each_region() {
        let catalog = catalog();
        let r1 = catalog.create_region("Bordeaux").unwrap();
        let r2 = catalog.create_region("Bourgogne").unwrap();
        catalog
            .create_bottle(Bottle::new("B1", 2010).with_region(r1.id.unwrap()))
            .unwrap();
        catalog
            .create_bottle(Bottle::new("B2", 2012).with_region(r2.id.unwrap()))
            .unwrap();

        let bottles = catalog.list_bottles_with_region_eager().unwrap();
        assert_eq!(bottles.len(), 2);

        for bottle in bottles {
            let region_ref = bottle.region_ref.expect("region must be set");
            let region = region_ref.resolved().expect("region must be resolved");
            match bottle.name.as_str() {
                "B1" => assert_eq!(region, &r1),
                "B2" => assert_eq!(region, &r2),
                other => panic!("unexpected bottle {other}"),
            }
        }
    }

    #[test]
    fn eager_listing_keeps_regionless_bottles() {
        let catalog = catalog();
        let region = catalog.create_region("Bordeaux").unwrap();
        catalog
            .create_bottle(Bottle::new("Attached", 2010).with_region(region.id.unwrap()))
            .unwrap();
        catalog
            .create_bottle(Bottle::new("Detached", 2011))
            .unwrap();

        let bottles = catalog.list_bottles_with_region_eager().unwrap();
        assert_eq!(bottles.len(), 2);

        let detached = bottles.iter().find(|b| b.name == "Detached").unwrap();
        assert!(detached.region_ref.is_none());
    }

    #[test]
    fn eager_listing_leaves_dangling_region_ids_unresolved() {
        let catalog = catalog();
        // Bypass create_bottle's liveness check to plant a dangling id.
        let ghost = DocumentId::new();
        catalog
            .bottles
            .save(Bottle::new("Dangling", 1999).with_region(ghost))
            .unwrap();

        let bottles = catalog.list_bottles_with_region_eager().unwrap();
        let bottle = &bottles[0];
        let region_ref = bottle.region_ref.as_ref().unwrap();
        assert!(!region_ref.is_resolved());
        assert_eq!(region_ref.id(), Some(ghost));
    }

    #[test]
    fn summaries_carry_only_projected_fields() {
        let catalog = catalog();
        let region = catalog.create_region("Bordeaux").unwrap();
        let bottle = catalog
            .create_bottle(
                Bottle::new("Château X", 2015)
                    .with_region(region.id.unwrap())
                    .with_color(Color::new("Rouge")),
            )
            .unwrap();
        catalog.add_review(bottle.id.unwrap(), "good").unwrap();

        let summaries = catalog.list_bottle_summaries().unwrap();
        assert_eq!(summaries.len(), 1);
        assert_eq!(
            summaries[0],
            BottleSummary {
                name: "Château X".to_string(),
                vintage_year: 2015,
                color: Some(Color::new("Rouge")),
            }
        );
    }

    #[test]
    fn find_by_color_matches_label() {
        let catalog = catalog();
        catalog
            .create_bottle(Bottle::new("Red One", 2010).with_color(Color::new("Rouge")))
            .unwrap();
        catalog
            .create_bottle(Bottle::new("White One", 2011).with_color(Color::new("Blanc")))
            .unwrap();
        catalog
            .create_bottle(Bottle::new("Colorless", 2012))
            .unwrap();

        let reds = catalog.find_bottles_by_color("Rouge").unwrap();
        assert_eq!(reds.len(), 1);
        assert_eq!(reds[0].name, "Red One");
    }
}
