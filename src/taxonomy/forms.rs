use crate::taxonomy::PS_ADDONS_CAT_ID;
use crate::taxonomy::meta::{MetaStore, ObjectKind};
use crate::taxonomy::registry::FormRenderer;
use crate::utils::escape_attr;

const LABEL: &str = "PrestaShop Addons category id";

/// Number input for the addons category id on the category admin forms
pub struct CategoryIdField;

impl FormRenderer for CategoryIdField {
    fn add_form(&self) -> String {
        format!(
            concat!(
                "<div class=\"form-field\">\n",
                "    <label for=\"{key}\">{label}</label>\n",
                "    <input type=\"number\" name=\"{key}\" id=\"{key}\">\n",
                "</div>\n"
            ),
            key = PS_ADDONS_CAT_ID,
            label = LABEL
        )
    }

    fn edit_form(&self, term_id: u64, meta: &MetaStore) -> String {
        let value = meta
            .get(ObjectKind::ProductCat, term_id, PS_ADDONS_CAT_ID)
            .map(|v| v.as_query_string())
            .unwrap_or_default();

        format!(
            concat!(
                "<tr class=\"form-field\">\n",
                "    <th scope=\"row\" valign=\"top\"><label for=\"{key}\">{label}</label></th>\n",
                "    <td>\n",
                "        <input type=\"number\" name=\"{key}\" id=\"{key}\" value=\"{value}\">\n",
                "    </td>\n",
                "</tr>\n"
            ),
            key = PS_ADDONS_CAT_ID,
            label = LABEL,
            value = escape_attr(&value)
        )
    }
}
