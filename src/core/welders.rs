use crate::db::Store;
use crate::db::schema::WELDERS;
use crate::errors::{AppError, AppResult};
use crate::models::Welder;

pub struct WelderLogic;

impl WelderLogic {
    pub fn add(store: &Store, name: &str) -> AppResult<Welder> {
        let mut welder = Welder::new(name);
        if welder.name.is_empty() {
            return Err(AppError::Other("Welder name cannot be empty".into()));
        }

        welder.id = Some(store.welders().add(&welder)?);
        store.log("add", WELDERS, &format!("Added welder '{}'", welder.name));
        Ok(welder)
    }

    pub fn rename(store: &Store, id: i64, name: &str) -> AppResult<Welder> {
        let mut welder = store
            .welders()
            .get(id)?
            .ok_or(AppError::WelderNotFound(id))?;
        let old = std::mem::replace(&mut welder.name, name.trim().to_string());
        if welder.name.is_empty() {
            return Err(AppError::Other("Welder name cannot be empty".into()));
        }

        store.welders().update(&welder)?;
        store.log(
            "edit",
            WELDERS,
            &format!("Renamed welder #{} '{}' → '{}'", id, old, welder.name),
        );
        Ok(welder)
    }

    /// Delete a welder. Records and allocations pointing at it are kept;
    /// returns how many records now reference a missing welder.
    pub fn delete(store: &Store, id: i64) -> AppResult<usize> {
        if !store.welders().delete(id)? {
            return Err(AppError::WelderNotFound(id));
        }

        let orphans = store.records().where_eq("welder_id", id)?.len();
        store.log("del", WELDERS, &format!("Deleted welder #{}", id));
        Ok(orphans)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_rename_delete() {
        let store = Store::open_in_memory().unwrap();

        let w = WelderLogic::add(&store, "  Ivanov ").unwrap();
        assert_eq!(w.id, Some(1));
        assert_eq!(w.name, "Ivanov");

        let r = WelderLogic::rename(&store, 1, "Ivanov I.").unwrap();
        assert_eq!(store.welders().get(1).unwrap(), Some(r));

        assert_eq!(WelderLogic::delete(&store, 1).unwrap(), 0);
        assert!(matches!(
            WelderLogic::delete(&store, 1),
            Err(AppError::WelderNotFound(1))
        ));
    }

    #[test]
    fn rejects_blank_names() {
        let store = Store::open_in_memory().unwrap();
        assert!(WelderLogic::add(&store, "   ").is_err());
        assert_eq!(store.welders().count().unwrap(), 0);
    }
}
