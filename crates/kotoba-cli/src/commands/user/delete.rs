use std::collections::BTreeMap;

use kotoba_core::responses::CountResponse;
use serde::Serialize;
use serde_json::{Value, json};

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

#[derive(Serialize)]
struct DeletedUser<'a> {
    deleted: &'a str,
}

pub async fn by_name(name: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    ctx.service.delete_user_by_name(name).await?;
    output(&DeletedUser { deleted: name }, flags.format)
}

pub async fn many(
    emails: &[String],
    names: &[String],
    ids: &[i64],
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let filters = membership_filters(emails, names, ids);
    let affected = ctx.service.delete_users(&filters).await?;
    output(&CountResponse { affected }, flags.format)
}

/// One membership list per given column; columns left empty do not filter.
fn membership_filters(
    emails: &[String],
    names: &[String],
    ids: &[i64],
) -> BTreeMap<String, Vec<Value>> {
    let mut filters = BTreeMap::new();
    if !emails.is_empty() {
        filters.insert("email".to_string(), emails.iter().map(|e| json!(e)).collect());
    }
    if !names.is_empty() {
        filters.insert("name".to_string(), names.iter().map(|n| json!(n)).collect());
    }
    if !ids.is_empty() {
        filters.insert("id".to_string(), ids.iter().map(|id| json!(id)).collect());
    }
    filters
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::membership_filters;

    #[test]
    fn only_given_columns_filter() {
        let filters = membership_filters(&["a@x.io".into(), "b@x.io".into()], &[], &[7]);
        assert_eq!(filters.keys().collect::<Vec<_>>(), ["email", "id"]);
        assert_eq!(filters["email"], [json!("a@x.io"), json!("b@x.io")]);
        assert_eq!(filters["id"], [json!(7)]);
    }

    #[test]
    fn no_filters_yields_empty_map() {
        assert!(membership_filters(&[], &[], &[]).is_empty());
    }
}
