// Addressable dashboard views

use std::fmt;
use std::str::FromStr;

use crate::errors::RouteError;

/// Dashboard views: the job list at `/`, one job at `/job/{id}`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Route {
    #[default]
    JobList,
    JobDetail(String),
}

impl Route {
    pub fn path(&self) -> String {
        self.to_string()
    }
}

impl FromStr for Route {
    type Err = RouteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let path = s.trim();
        let trimmed = path.trim_end_matches('/');

        if trimmed.is_empty() {
            return Ok(Route::JobList);
        }

        match trimmed.strip_prefix("/job") {
            Some("") => Err(RouteError::MissingJobId(path.to_string())),
            Some(rest) => match rest.strip_prefix('/') {
                Some(id) if !id.is_empty() && !id.contains('/') => {
                    Ok(Route::JobDetail(id.to_string()))
                }
                _ => Err(RouteError::Unknown(path.to_string())),
            },
            None => Err(RouteError::Unknown(path.to_string())),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::JobList => f.write_str("/"),
            Route::JobDetail(id) => write!(f, "/job/{}", id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_root() {
        assert_eq!("/".parse::<Route>(), Ok(Route::JobList));
        assert_eq!("".parse::<Route>(), Ok(Route::JobList));
    }

    #[test]
    fn test_parse_job_detail() {
        assert_eq!(
            "/job/app-20240301-0001".parse::<Route>(),
            Ok(Route::JobDetail("app-20240301-0001".to_string()))
        );
        assert_eq!(
            "/job/abc/".parse::<Route>(),
            Ok(Route::JobDetail("abc".to_string()))
        );
    }

    #[test]
    fn test_parse_rejects_unknown_paths() {
        assert!(matches!("/jobs".parse::<Route>(), Err(RouteError::Unknown(_))));
        assert!(matches!("/job/a/b".parse::<Route>(), Err(RouteError::Unknown(_))));
        assert!(matches!("/settings".parse::<Route>(), Err(RouteError::Unknown(_))));
        assert!(matches!("/job".parse::<Route>(), Err(RouteError::MissingJobId(_))));
    }

    #[test]
    fn test_path_matches_display() {
        assert_eq!(Route::JobList.path(), "/");
        assert_eq!(Route::JobDetail("x".to_string()).path(), "/job/x");
    }
}
