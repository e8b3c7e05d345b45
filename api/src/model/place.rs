use garde::Validate;
use serde::Deserialize;

#[derive(Debug, Deserialize, Validate)]
pub struct PlacePhotoQuery {
    #[garde(length(min = 1, max = 2048))]
    pub reference: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn photo_query_requires_reference() -> anyhow::Result<()> {
        let ok: PlacePhotoQuery = serde_json::from_str(r#"{ "reference": "Aap_uEA7" }"#)?;
        assert!(ok.validate(&()).is_ok());

        let empty: PlacePhotoQuery = serde_json::from_str(r#"{ "reference": "" }"#)?;
        assert!(empty.validate(&()).is_err());
        Ok(())
    }
}
