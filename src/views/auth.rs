use axum::response::Html;

use super::{flash_html, layout, Flash};
use crate::models::user::SessionUser;
use crate::utils::html::escape;

pub fn signup_page(full_name: &str, email: &str, flash: Option<&Flash>) -> Html<String> {
    layout(
        "Sign up",
        &format!(
            r#"<h1>Create an account</h1>
{flash}
<form method="post" action="/signup">
<label for="full_name">Full name</label>
<input id="full_name" name="full_name" required value="{full_name}">
<label for="email">Email</label>
<input id="email" name="email" type="email" required value="{email}">
<label for="password">Password</label>
<input id="password" name="password" type="password" minlength="6" required>
<p><button type="submit">Sign up</button> Already registered? <a href="/login">Sign in</a></p>
</form>"#,
            flash = flash_html(flash),
            full_name = escape(full_name),
            email = escape(email),
        ),
    )
}

pub fn login_page(email: &str, flash: Option<&Flash>) -> Html<String> {
    layout(
        "Sign in",
        &format!(
            r#"<h1>Sign in</h1>
{flash}
<form method="post" action="/login">
<label for="email">Email</label>
<input id="email" name="email" type="email" required value="{email}">
<label for="password">Password</label>
<input id="password" name="password" type="password" required>
<p><button type="submit">Sign in</button> New here? <a href="/signup">Create an account</a></p>
</form>"#,
            flash = flash_html(flash),
            email = escape(email),
        ),
    )
}

pub fn home_page(viewer: Option<&SessionUser>) -> Html<String> {
    let greeting = match viewer {
        Some(user) => format!(
            "<p>Signed in as {}.</p>",
            escape(user.email.as_deref().unwrap_or("an administrator"))
        ),
        None => r#"<p>You are not signed in. <a href="/login">Sign in</a> or <a href="/signup">create an account</a>.</p>"#
            .to_string(),
    };
    layout(
        "Home",
        &format!(
            r#"<h1>TalentSync admin console</h1>
{}
<ul>
<li><a href="/admin/vacancies">Browse vacancies</a></li>
<li><a href="/admin/vacancies/create">Create a vacancy</a></li>
<li><a href="/admin/assign-skill">Assign a skill to a profile</a></li>
</ul>"#,
            greeting
        ),
    )
}
