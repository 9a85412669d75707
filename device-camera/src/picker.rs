// Platform-specific picture acquisition
//
// On Android this calls into MainActivity over JNI and polls for the result the
// activity stores once the camera or gallery intent returns. Other platforms
// have no picker and report that as an error.

use crate::options::{AcquisitionMode, DestinationType, PictureOptions};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerError {
    PermissionDenied(String),
    /// The activity reported a reason string (cancellations included)
    Failed(String),
    PlatformNotSupported(String),
    /// Talking to the JVM failed before the picker could be launched
    Jni(String),
}

impl std::fmt::Display for PickerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PickerError::PermissionDenied(msg) => write!(f, "Permission denied: {}", msg),
            PickerError::Failed(msg) => write!(f, "{}", msg),
            PickerError::PlatformNotSupported(msg) => write!(f, "Platform not supported: {}", msg),
            PickerError::Jni(msg) => write!(f, "JNI error: {}", msg),
        }
    }
}

impl std::error::Error for PickerError {}

const DEFAULT_MAIN_ACTIVITY_CLASS: &str = "dev/dioxus/main/MainActivity";
const DEFAULT_POLL_INTERVAL_MS: u64 = 100;

#[cfg(target_os = "android")]
use jni::objects::{JClass, JObject, JString, JValue};

#[cfg(target_os = "android")]
use ndk_context::android_context;

/// Configuration for the picker on Android
#[derive(Debug, Clone)]
pub struct AndroidPickerConfig {
    /// Fully qualified class name in slash format (e.g., "com/example/myapp/MainActivity")
    pub main_activity_class: String,
    /// How often the activity is asked for a result
    pub poll_interval_ms: u64,
}

impl Default for AndroidPickerConfig {
    fn default() -> Self {
        Self {
            main_activity_class: DEFAULT_MAIN_ACTIVITY_CLASS.to_string(),
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

/// Turns a plain filesystem path into a `file://` locator
pub fn to_file_uri(path: &str) -> String {
    if path.contains("://") {
        path.to_string()
    } else {
        format!("file://{}", path)
    }
}

/// Shapes the path reported by the activity into the requested locator. The
/// activity always writes the picture to a file and reports its path.
pub fn locator_for(path: &str, destination: DestinationType) -> String {
    match destination {
        DestinationType::FileUri => to_file_uri(path),
    }
}

/// What one poll of the activity found
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollResult {
    Pending,
    Path(String),
    Reason(String),
}

/// Polls until the activity reports a path or a reason. A failing poll ends
/// the wait with its error, since nothing else would ever end it.
pub fn wait_for_result(
    interval: std::time::Duration,
    mut poll: impl FnMut() -> Result<PollResult, PickerError>,
) -> Result<String, PickerError> {
    loop {
        match poll()? {
            PollResult::Pending => std::thread::sleep(interval),
            PollResult::Path(path) => return Ok(path),
            PollResult::Reason(reason) => return Err(PickerError::Failed(reason)),
        }
    }
}

#[cfg(target_os = "android")]
fn jni_err(context: &str) -> impl Fn(jni::errors::Error) -> PickerError + '_ {
    move |e| PickerError::Jni(format!("{} failed: {}", context, e))
}

#[cfg(target_os = "android")]
fn get_app_class_loader<'a>(env: &mut jni::JNIEnv<'a>) -> Result<JObject<'a>, PickerError> {
    let at_cls = env
        .find_class("android/app/ActivityThread")
        .map_err(jni_err("find ActivityThread"))?;
    let at = env
        .call_static_method(
            &at_cls,
            "currentActivityThread",
            "()Landroid/app/ActivityThread;",
            &[],
        )
        .map_err(jni_err("currentActivityThread"))?
        .l()
        .map_err(jni_err("currentActivityThread result"))?;

    let app = env
        .call_method(&at, "getApplication", "()Landroid/app/Application;", &[])
        .map_err(jni_err("getApplication"))?
        .l()
        .map_err(jni_err("getApplication result"))?;

    // Before the application is bound only the system context has a loader
    let owner = if app.is_null() {
        env.call_method(&at, "getSystemContext", "()Landroid/app/ContextImpl;", &[])
            .map_err(jni_err("getSystemContext"))?
            .l()
            .map_err(jni_err("getSystemContext result"))?
    } else {
        app
    };

    env.call_method(&owner, "getClassLoader", "()Ljava/lang/ClassLoader;", &[])
        .map_err(jni_err("getClassLoader"))?
        .l()
        .map_err(jni_err("getClassLoader result"))
}

#[cfg(target_os = "android")]
fn load_class<'a>(
    env: &mut jni::JNIEnv<'a>,
    loader: &JObject<'a>,
    fq_slash: &str,
) -> Result<JClass<'a>, PickerError> {
    // ClassLoader.loadClass wants dots, JNI signatures want slashes
    let name: JString = env
        .new_string(fq_slash.replace('/', "."))
        .map_err(jni_err("new_string"))?;
    let cls_obj = env
        .call_method(
            loader,
            "loadClass",
            "(Ljava/lang/String;)Ljava/lang/Class;",
            &[JValue::Object(&JObject::from(name))],
        )
        .map_err(jni_err("ClassLoader.loadClass"))?
        .l()
        .map_err(jni_err("loadClass result"))?;
    Ok(JClass::from(cls_obj))
}

#[cfg(target_os = "android")]
fn instance_from_companion<'a>(
    env: &mut jni::JNIEnv<'a>,
    cls: &JClass<'a>,
    config: &AndroidPickerConfig,
    signature: &str,
) -> Result<JObject<'a>, PickerError> {
    let comp_signature = format!("L{}$Companion;", config.main_activity_class);
    let comp_obj = env
        .get_static_field(cls, "Companion", &comp_signature)
        .map_err(jni_err("Companion field"))?
        .l()
        .map_err(jni_err("Companion field value"))?;

    if comp_obj.is_null() {
        return Err(PickerError::Jni(
            "MainActivity.Companion is null, activity not initialized?".to_string(),
        ));
    }

    env.call_method(&comp_obj, "getInstance", signature, &[])
        .map_err(jni_err("Companion.getInstance()"))?
        .l()
        .map_err(jni_err("Companion.getInstance() result"))
}

#[cfg(target_os = "android")]
fn get_activity_instance<'a>(
    env: &mut jni::JNIEnv<'a>,
    config: &AndroidPickerConfig,
) -> Result<(JObject<'a>, JClass<'a>), PickerError> {
    let loader = get_app_class_loader(env)?;
    let cls = load_class(env, &loader, &config.main_activity_class)?;
    let signature = format!("()L{};", config.main_activity_class);

    // `@JvmStatic getInstance()` first, then the static field, then the companion
    let instance = match env.call_static_method(&cls, "getInstance", &signature, &[]) {
        Ok(val) => val.l().map_err(jni_err("getInstance() result"))?,
        Err(_) => {
            if env.exception_check().unwrap_or(false) {
                let _ = env.exception_clear();
            }
            let field_signature = format!("L{};", config.main_activity_class);
            match env.get_static_field(&cls, "instance", &field_signature) {
                Ok(field) => {
                    let inst = field.l().map_err(jni_err("instance field"))?;
                    if inst.is_null() {
                        instance_from_companion(env, &cls, config, &signature)?
                    } else {
                        inst
                    }
                }
                Err(_) => {
                    if env.exception_check().unwrap_or(false) {
                        let _ = env.exception_clear();
                    }
                    instance_from_companion(env, &cls, config, &signature)?
                }
            }
        }
    };

    if instance.is_null() {
        return Err(PickerError::Jni(
            "MainActivity instance is null, activity not initialized?".to_string(),
        ));
    }

    Ok((instance, cls))
}

#[cfg(target_os = "android")]
fn poll_string<'a>(
    env: &mut jni::JNIEnv<'a>,
    cls: &JClass<'a>,
    getter: &str,
) -> Result<Option<String>, PickerError> {
    let obj = match env
        .call_static_method(cls, getter, "()Ljava/lang/String;", &[])
        .and_then(|v| v.l())
    {
        Ok(obj) => obj,
        Err(e) => {
            if env.exception_check().unwrap_or(false) {
                let _ = env.exception_clear();
            }
            return Err(PickerError::Jni(format!("{} failed: {}", getter, e)));
        }
    };
    if obj.is_null() {
        return Ok(None);
    }
    let value: String = env
        .get_string((&obj).into())
        .map_err(jni_err("String conversion"))?
        .into();
    Ok(Some(value))
}

/// Launches the camera or the gallery picker and blocks until the activity
/// reports a path or an error reason. There is no timeout; the activity always
/// reports back, cancellations included.
#[cfg(target_os = "android")]
pub fn acquire_picture_with_config(
    config: &AndroidPickerConfig,
    options: &PictureOptions,
) -> Result<String, PickerError> {
    let vm_ptr = android_context().vm() as *mut *const jni::sys::JNIInvokeInterface_;
    let vm = unsafe { jni::JavaVM::from_raw(vm_ptr) }.map_err(jni_err("JavaVM"))?;
    let mut env = vm.attach_current_thread().map_err(jni_err("JNI attach"))?;

    let (activity, main_cls) = get_activity_instance(&mut env, config)?;

    env.call_static_method(&main_cls, "clearLastError", "()V", &[])
        .map_err(jni_err("clearLastError"))?;

    let quality = JValue::Int(options.quality as i32);
    let orientation = JValue::Bool(options.correct_orientation as u8);
    match options.mode {
        AcquisitionMode::Capture => env.call_method(
            &activity,
            "launchCamera",
            "(ZIZ)V",
            &[
                JValue::Bool(options.save_to_photo_album as u8),
                quality,
                orientation,
            ],
        ),
        AcquisitionMode::SelectExisting => {
            env.call_method(&activity, "launchImagePicker", "(IZ)V", &[quality, orientation])
        }
    }
    .map_err(|e| match e {
        jni::errors::Error::JavaException => {
            PickerError::PermissionDenied(format!("launch {} refused", options.mode.as_str()))
        }
        other => PickerError::Jni(format!("launch {} failed: {}", options.mode.as_str(), other)),
    })?;

    log::debug!("Picker launched in {} mode", options.mode.as_str());

    let interval = std::time::Duration::from_millis(config.poll_interval_ms);
    let path = wait_for_result(interval, || {
        if let Some(path) = poll_string(&mut env, &main_cls, "getLastPhotoPath")? {
            return Ok(PollResult::Path(path));
        }
        if let Some(reason) = poll_string(&mut env, &main_cls, "getLastError")? {
            return Ok(PollResult::Reason(reason));
        }
        Ok(PollResult::Pending)
    })?;

    Ok(locator_for(&path, options.destination_type))
}

#[cfg(not(target_os = "android"))]
pub fn acquire_picture_with_config(
    _config: &AndroidPickerConfig,
    options: &PictureOptions,
) -> Result<String, PickerError> {
    let what = match options.mode {
        AcquisitionMode::Capture => "Camera",
        AcquisitionMode::SelectExisting => "Image picker",
    };
    Err(PickerError::PlatformNotSupported(format!(
        "{} not available on this platform",
        what
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_file_uri_adds_scheme() {
        assert_eq!(to_file_uri("/tmp/img1.jpg"), "file:///tmp/img1.jpg");
    }

    #[test]
    fn test_to_file_uri_keeps_existing_scheme() {
        assert_eq!(
            to_file_uri("content://media/external/images/1"),
            "content://media/external/images/1"
        );
    }

    #[test]
    fn test_locator_for_file_uri() {
        assert_eq!(
            locator_for("/storage/emulated/0/DCIM/a.jpg", DestinationType::FileUri),
            "file:///storage/emulated/0/DCIM/a.jpg"
        );
    }

    #[test]
    fn test_wait_returns_path_after_pending_polls() {
        let mut polls = vec![
            PollResult::Path("/tmp/a.jpg".to_string()),
            PollResult::Pending,
            PollResult::Pending,
        ];
        let result = wait_for_result(std::time::Duration::from_millis(1), || {
            Ok(polls.pop().unwrap())
        });
        assert_eq!(result, Ok("/tmp/a.jpg".to_string()));
        assert!(polls.is_empty());
    }

    #[test]
    fn test_wait_returns_reported_reason() {
        let result = wait_for_result(std::time::Duration::from_millis(1), || {
            Ok(PollResult::Reason("Camera cancelled.".to_string()))
        });
        assert_eq!(result, Err(PickerError::Failed("Camera cancelled.".to_string())));
    }

    #[test]
    fn test_wait_stops_when_polling_breaks() {
        let mut calls = 0;
        let result = wait_for_result(std::time::Duration::from_millis(1), || {
            calls += 1;
            if calls < 3 {
                Ok(PollResult::Pending)
            } else {
                Err(PickerError::Jni("getLastPhotoPath failed: NoSuchMethodError".to_string()))
            }
        });
        assert!(matches!(result, Err(PickerError::Jni(_))));
        assert_eq!(calls, 3);
    }

    #[test]
    fn test_failed_displays_the_raw_reason() {
        let err = PickerError::Failed("Camera cancelled.".to_string());
        assert_eq!(err.to_string(), "Camera cancelled.");
    }

    #[cfg(not(target_os = "android"))]
    #[test]
    fn test_desktop_has_no_picker() {
        let opts = PictureOptions::for_mode(AcquisitionMode::Capture);
        let err = acquire_picture_with_config(&AndroidPickerConfig::default(), &opts).unwrap_err();
        assert!(matches!(err, PickerError::PlatformNotSupported(_)));
    }
}
