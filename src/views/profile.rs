use bidash_shared::User;

/// 个人资料卡片的一行
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileField {
    pub label: &'static str,
    pub value: String,
}

fn or_fallback(value: &str, fallback: &str) -> String {
    if value.trim().is_empty() {
        fallback.to_string()
    } else {
        value.to_string()
    }
}

/// 资料页直接读会话中的用户，不再请求后端
pub fn profile_fields(user: Option<&User>) -> Vec<ProfileField> {
    let (name, email, id) = match user {
        Some(u) => (u.name.as_str(), u.email.as_str(), u.id.as_str()),
        None => ("", "", ""),
    };

    vec![
        ProfileField {
            label: "Full Name",
            value: or_fallback(name, "Not provided"),
        },
        ProfileField {
            label: "Email Address",
            value: or_fallback(email, "Not provided"),
        },
        ProfileField {
            label: "Account Status",
            value: "Active".to_string(),
        },
        ProfileField {
            label: "Account ID",
            value: or_fallback(id, "Not available"),
        },
    ]
}
