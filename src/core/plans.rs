use crate::db::Store;
use crate::db::schema::PLANS;
use crate::errors::{AppError, AppResult};
use crate::models::Plan;

pub struct PlanLogic;

impl PlanLogic {
    pub fn create(store: &Store, article: &str, quantity: i64, unlimited: bool) -> AppResult<Plan> {
        let article = article.trim();
        if article.is_empty() {
            return Err(AppError::Other("Article cannot be empty".into()));
        }
        if quantity < 0 || (quantity == 0 && !unlimited) {
            return Err(AppError::InvalidQuantity(format!(
                "plan quantity must be positive, got {}",
                quantity
            )));
        }

        let mut plan = Plan::new(article, quantity, unlimited);
        plan.id = Some(store.plans().add(&plan)?);
        store.log(
            "add",
            PLANS,
            &format!(
                "Plan for {}: {}",
                plan.article,
                if unlimited {
                    "unlimited".to_string()
                } else {
                    quantity.to_string()
                }
            ),
        );
        Ok(plan)
    }

    /// Set the completed count. It may only grow.
    pub fn set_completed(store: &Store, id: i64, completed: i64) -> AppResult<Plan> {
        let mut plan = store.plans().get(id)?.ok_or(AppError::PlanNotFound(id))?;

        if completed < plan.completed {
            return Err(AppError::PlanRegression {
                id,
                current: plan.completed,
                requested: completed,
            });
        }

        let before = plan.completed;
        plan.completed = completed;
        store.plans().update(&plan)?;
        store.log(
            "progress",
            PLANS,
            &format!("Plan #{} ({}): {} → {}", id, plan.article, before, completed),
        );
        Ok(plan)
    }

    /// Add `delta` (≥ 0) finished units.
    pub fn add_completed(store: &Store, id: i64, delta: i64) -> AppResult<Plan> {
        if delta < 0 {
            return Err(AppError::InvalidQuantity(format!(
                "completed units cannot be negative, got {}",
                delta
            )));
        }
        let plan = store.plans().get(id)?.ok_or(AppError::PlanNotFound(id))?;
        let completed = plan.completed.checked_add(delta).ok_or_else(|| {
            AppError::InvalidQuantity(format!(
                "{} + {} finished units is out of range",
                plan.completed, delta
            ))
        })?;
        Self::set_completed(store, id, completed)
    }

    pub fn delete(store: &Store, id: i64) -> AppResult<()> {
        if !store.plans().delete(id)? {
            return Err(AppError::PlanNotFound(id));
        }
        store.log("del", PLANS, &format!("Deleted plan #{}", id));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completed_only_grows() {
        let store = Store::open_in_memory().unwrap();
        let p = PlanLogic::create(&store, "ХТ637", 10, false).unwrap();
        let id = p.id.unwrap();

        PlanLogic::add_completed(&store, id, 4).unwrap();
        let p = PlanLogic::set_completed(&store, id, 6).unwrap();
        assert_eq!(p.completed, 6);
        assert_eq!(p.remaining(), Some(4));

        let err = PlanLogic::set_completed(&store, id, 5).unwrap_err();
        assert!(matches!(
            err,
            AppError::PlanRegression {
                current: 6,
                requested: 5,
                ..
            }
        ));
        assert!(PlanLogic::add_completed(&store, id, -1).is_err());
        assert_eq!(store.plans().get(id).unwrap().unwrap().completed, 6);
    }

    #[test]
    fn unlimited_plans_may_have_zero_quantity() {
        let store = Store::open_in_memory().unwrap();
        assert!(PlanLogic::create(&store, "ХТ55", 0, false).is_err());

        let p = PlanLogic::create(&store, "ХТ55", 0, true).unwrap();
        let p = PlanLogic::add_completed(&store, p.id.unwrap(), 1000).unwrap();
        assert!(!p.is_complete());
        assert_eq!(p.remaining(), None);
    }

    #[test]
    fn huge_increment_is_rejected_without_change() {
        let store = Store::open_in_memory().unwrap();
        let id = PlanLogic::create(&store, "ХТ637", 10, false).unwrap().id.unwrap();
        PlanLogic::add_completed(&store, id, 1).unwrap();

        assert!(matches!(
            PlanLogic::add_completed(&store, id, i64::MAX),
            Err(AppError::InvalidQuantity(_))
        ));
        assert_eq!(store.plans().get(id).unwrap().unwrap().completed, 1);
    }

    #[test]
    fn missing_plan() {
        let store = Store::open_in_memory().unwrap();
        assert!(matches!(
            PlanLogic::set_completed(&store, 42, 1),
            Err(AppError::PlanNotFound(42))
        ));
        assert!(PlanLogic::delete(&store, 42).is_err());
    }
}
