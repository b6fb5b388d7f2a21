/// wire::controller -Prefix=/users
pub struct Users;

impl Users {
    /// wire::route GET /
    #[allow(non_snake_case)]
    pub fn listUsers(&self) {}

    /// wire::route GET /{id}
    pub fn get_user(&self, id: String) {}

    /// wire::route POST /{id}/avatar
    #[allow(non_snake_case)]
    pub fn UploadAvatar(&self, id: String, body: Avatar) {}
}
