/// wire::controller -Prefix=/orgs/{org}
pub struct Repos;

impl Repos {
    /// wire::route GET /repos/{repo}
    pub fn get_repo(&self, repo: String) {}

    /// wire::route GET /files/{*}
    pub fn get_file(&self, org: String) {}
}
