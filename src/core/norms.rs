use crate::db::Store;
use crate::db::schema::NORMS;
use crate::errors::{AppError, AppResult};
use crate::models::Norm;

pub struct NormLogic;

impl NormLogic {
    /// Insert or update the norm for `article`. Returns the stored norm and
    /// the previous time, if there was one.
    pub fn set(store: &Store, article: &str, time: f64) -> AppResult<(Norm, Option<f64>)> {
        let article = article.trim();
        if article.is_empty() {
            return Err(AppError::Other("Article cannot be empty".into()));
        }
        if !time.is_finite() || time <= 0.0 {
            return Err(AppError::InvalidHours(time.to_string()));
        }

        match store.norms().first_where("article", article)? {
            Some(mut norm) => {
                let previous = norm.time;
                norm.time = time;
                store.norms().update(&norm)?;
                store.log(
                    "edit",
                    NORMS,
                    &format!("{}: {} → {}", article, previous, time),
                );
                Ok((norm, Some(previous)))
            }
            None => {
                let mut norm = Norm::new(article, time);
                norm.id = Some(store.norms().add(&norm)?);
                store.log("add", NORMS, &format!("{}: {}", article, time));
                Ok((norm, None))
            }
        }
    }

    pub fn delete(store: &Store, article: &str) -> AppResult<usize> {
        let matching = store.norms().where_eq("article", article)?;
        if matching.is_empty() {
            return Err(AppError::NormNotFound(article.to_string()));
        }
        for n in &matching {
            if let Some(id) = n.id {
                store.norms().delete(id)?;
            }
        }
        store.log("del", NORMS, &format!("Deleted norm {}", article));
        Ok(matching.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_updates_existing_article() {
        let store = Store::open_in_memory().unwrap();
        let (n, prev) = NormLogic::set(&store, "ХТ55", 11.0).unwrap();
        assert_eq!(prev, Some(12.0));
        assert_eq!(n.time, 11.0);
        assert_eq!(store.norms().count().unwrap(), 5);

        let (_, prev) = NormLogic::set(&store, "NEW-7", 1.5).unwrap();
        assert_eq!(prev, None);
        assert_eq!(store.norms().count().unwrap(), 6);
    }

    #[test]
    fn delete_by_article() {
        let store = Store::open_in_memory().unwrap();
        assert_eq!(NormLogic::delete(&store, "ХТ52").unwrap(), 1);
        assert!(matches!(
            NormLogic::delete(&store, "ХТ52"),
            Err(AppError::NormNotFound(_))
        ));
        assert!(NormLogic::set(&store, "X", 0.0).is_err());
    }
}
