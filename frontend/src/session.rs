//! Login session as stored in `localStorage` by the login page.

use web_sys::Storage;

const USERNAME_KEY: &str = "username";
const TOKEN_KEY: &str = "token";

fn local_storage() -> Option<Storage> {
    web_sys::window()?.local_storage().ok()?
}

fn read(key: &str) -> Option<String> {
    local_storage()?
        .get_item(key)
        .ok()?
        .filter(|value| !value.is_empty())
}

pub fn username() -> Option<String> {
    read(USERNAME_KEY)
}

pub fn token() -> Option<String> {
    read(TOKEN_KEY)
}
