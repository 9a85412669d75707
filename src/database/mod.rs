pub mod schema;

use crate::error::AppError;
use rusqlite::Connection;
use std::path::PathBuf;

#[cfg(target_os = "android")]
use jni::objects::JObject;
#[cfg(target_os = "android")]
use jni::JNIEnv;
#[cfg(target_os = "android")]
use ndk_context::android_context;

const DATABASE_FILE: &str = "streetreport.db";

/// Returns the app directory (database, config and photos live here)
#[cfg(target_os = "android")]
pub fn get_app_directory() -> PathBuf {
    match android_files_dir() {
        Ok(dir) => dir,
        Err(e) => {
            log::error!("Could not resolve files dir: {}", e);
            PathBuf::from("/data/local/tmp/streetreport")
        }
    }
}

#[cfg(not(target_os = "android"))]
pub fn get_app_directory() -> PathBuf {
    PathBuf::from("./data")
}

/// Returns the path of the SQLite database
pub fn get_database_path() -> PathBuf {
    get_app_directory().join(DATABASE_FILE)
}

#[cfg(target_os = "android")]
fn android_files_dir() -> Result<PathBuf, AppError> {
    use jni::JavaVM;

    let vm_ptr = android_context().vm() as *mut jni::sys::JavaVM;
    let vm = unsafe { JavaVM::from_raw(vm_ptr) }
        .map_err(|e| AppError::Config(format!("JavaVM creation failed: {}", e)))?;
    let mut env = vm
        .attach_current_thread()
        .map_err(|e| AppError::Config(format!("Failed to attach thread: {}", e)))?;

    let context_ptr = android_context().context();
    let context = unsafe { JObject::from_raw(context_ptr as jni::sys::jobject) };

    get_files_dir(&mut env, &context)
}

#[cfg(target_os = "android")]
fn get_files_dir(env: &mut JNIEnv, context: &JObject) -> Result<PathBuf, AppError> {
    let file = env
        .call_method(context, "getFilesDir", "()Ljava/io/File;", &[])
        .and_then(|v| v.l())
        .map_err(|e| AppError::Config(format!("getFilesDir failed: {}", e)))?;

    let path_obj = env
        .call_method(file, "getAbsolutePath", "()Ljava/lang/String;", &[])
        .and_then(|v| v.l())
        .map_err(|e| AppError::Config(format!("getAbsolutePath failed: {}", e)))?;

    let path_str: String = env
        .get_string(&path_obj.into())
        .map_err(|e| AppError::Config(format!("Failed to get string: {}", e)))?
        .into();

    Ok(PathBuf::from(path_str))
}

/// Opens the database and makes sure the schema exists
pub fn init_database() -> Result<Connection, AppError> {
    let db_path = get_database_path();

    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let conn = Connection::open(&db_path)?;
    schema::init_schema(&conn)?;

    Ok(conn)
}
