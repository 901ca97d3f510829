use actix_session::Session;

use crate::errors::AppError;

const USER_ID: &str = "user_id";
const USERNAME: &str = "username";
const FLASH: &str = "flash";

/// Id of the signed-in staff user, if any.
pub fn get_user_id(session: &Session) -> Option<i64> {
    session.get::<i64>(USER_ID).unwrap_or(None)
}

pub fn get_username(session: &Session) -> Option<String> {
    session.get::<String>(USERNAME).unwrap_or(None)
}

pub fn is_staff(session: &Session) -> bool {
    get_user_id(session).is_some()
}

/// Record a successful staff login. Renews the session id first.
pub fn sign_in(session: &Session, user_id: i64, username: &str) -> Result<(), AppError> {
    session.renew();
    session
        .insert(USER_ID, user_id)
        .and_then(|_| session.insert(USERNAME, username))
        .map_err(|e| AppError::Session(e.to_string()))
}

/// Drop the staff login but keep the visitor's language choice.
pub fn sign_out(session: &Session) {
    session.remove(USER_ID);
    session.remove(USERNAME);
    session.renew();
}

pub fn set_flash(session: &Session, msg: impl AsRef<str>) {
    let _ = session.insert(FLASH, msg.as_ref());
}

pub fn take_flash(session: &Session) -> Option<String> {
    let flash = session.get::<String>(FLASH).unwrap_or(None);
    if flash.is_some() {
        session.remove(FLASH);
    }
    flash
}
