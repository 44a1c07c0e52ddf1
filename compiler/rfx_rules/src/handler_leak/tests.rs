use rfx_ir::ProjectOptions;

use super::*;
use crate::test_util::{android, assert_rewrites, assert_unchanged};

fn activity(body: &str) -> String {
    format!(
        "import android.app.Activity;
import android.os.Handler;
import android.os.Message;
import android.widget.TextView;

public class Main extends Activity {{
    private TextView label;

{body}}}
"
    )
}

#[test]
fn test_anonymous_handler_becomes_static() {
    let source = activity(
        "    private final Handler mHandler = new Handler() {
        @Override
        public void handleMessage(Message msg) {
            label.setText(\"done \" + msg.what);
            refresh();
        }
    };

    void refresh() {
    }
",
    );
    let expected = "import android.app.Activity;
import android.os.Handler;
import android.os.Message;
import android.widget.TextView;
import java.lang.ref.WeakReference;

public class Main extends Activity {
    private TextView label;

    private final Handler mHandler = new MainHandler(this);
    private void handleHandlerMessage(Message msg) {
        label.setText(\"done \" + msg.what);
        refresh();
    }
    private static class MainHandler extends Handler {
        private final WeakReference<Main> activity;
        MainHandler(Main activity) {
            this.activity = new WeakReference<Main>(activity);
        }
        @Override public void handleMessage(Message msg) {
            Main activity = this.activity.get();
            if (activity != null) {
                activity.handleHandlerMessage(msg);
            }
        }
    }

    void refresh() {
    }
}
";
    assert_rewrites(&HandlerLeak, android(), &source, expected);
}

#[test]
fn test_handler_methods_keep_the_handler_anonymous() {
    let source = activity(
        "    private Handler ticker = new Handler() {
        public void handleMessage(Message msg) {
            sendEmptyMessageDelayed(0, 1000);
        }
    };

    private Handler self = new Handler() {
        public void handleMessage(Message msg) {
            this.removeMessages(1);
        }
    };
",
    );
    assert_unchanged(&HandlerLeak, android(), &source);
}

#[test]
fn test_inner_classes_and_taken_names_stay() {
    let inner = activity(
        "    class Page {
        Handler handler = new Handler() {
            public void handleMessage(Message msg) {
                label.setText(\"x\");
            }
        };
    }
",
    );
    assert_unchanged(&HandlerLeak, android(), &inner);

    let taken = activity(
        "    Handler handler = new Handler() {
        public void handleMessage(Message msg) {
            label.setText(\"x\");
        }
    };

    static class MainHandler {
    }
",
    );
    assert_unchanged(&HandlerLeak, android(), &taken);
}

#[test]
fn test_needs_android() {
    let source = activity(
        "    Handler handler = new Handler() {
        public void handleMessage(Message msg) {
            label.setText(\"x\");
        }
    };
",
    );
    assert_unchanged(&HandlerLeak, ProjectOptions::default(), &source);
}

#[test]
fn test_capitalized_drops_the_member_prefix() {
    assert_eq!(capitalized("mHandler"), "Handler");
    assert_eq!(capitalized("handler"), "Handler");
    assert_eq!(capitalized("mode"), "Mode");
}
